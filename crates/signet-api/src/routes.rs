//! API route definitions

use crate::auth::middleware::auth_middleware;
use crate::handlers::auth;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new().route("/auth/token", post(auth::authenticate_handler));

    // Protected routes (valid bearer token required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::current_user_handler))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
