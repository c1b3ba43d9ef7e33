//! Signet API Server
//!
//! Issues and validates signed bearer tokens for password-authenticated
//! users.

use signet_api::{auth, create_router, state::AppState};
use signet_core::config::AppConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration: explicit file if given, environment otherwise
    let config = match std::env::var("SIGNET_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?,
        Err(_) => AppConfig::from_env()?,
    };

    // A missing or undersized signing key is not recoverable
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "signet_api={level},tower_http={level}",
            level = config.logging.level
        ))
    });
    if config.logging.json_format {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::new(config));

    if state.config.store.seed_demo_users {
        auth::seed_demo_users(&state.store).await;
    }

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Signet API server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
