//! API Integration Tests
//!
//! Drives the full router through `tower::ServiceExt::oneshot` with an
//! in-memory credential store, covering the issuance and validation paths
//! end to end.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use signet_api::auth::seed_demo_users;
use signet_api::{create_router, state::AppState};
use signet_core::config::AppConfig;
use std::sync::Arc;
use tower::ServiceExt;

/// Router backed by a freshly seeded in-memory store
async fn test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(AppConfig::default()));
    seed_demo_users(&state.store).await;
    (create_router(state.clone()), state)
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Authenticate and return the issued token
async fn obtain_token(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(form_request(
            "/api/v1/auth/token",
            &format!("username={username}&password={password}"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["succeeded"], true);
    json["token"].as_str().unwrap().to_string()
}

// =============================================================================
// Health Check Tests
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_check() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get_request("/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ready"], true);
    assert_eq!(json["checks"]["credential_store"], true);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = test_app().await;

    let response = app.oneshot(get_request("/metrics", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["uptime_seconds"].is_number());
    assert!(json["total_requests"].is_number());
}

// =============================================================================
// Issuance Tests
// =============================================================================

#[tokio::test]
async fn test_authenticate_issues_valid_token() {
    let (app, state) = test_app().await;

    let token = obtain_token(&app, "admin@test.com", "P@ss.W0rd").await;

    // Compact JWS: three dot-separated segments
    assert_eq!(token.split('.').count(), 3);

    // The token validates against the same service configuration
    let claims = state.auth.validate(&token).unwrap();
    assert_eq!(claims.name(), Some("admin@test.com"));
    assert_eq!(claims.roles(), vec!["Administrator"]);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(form_request(
            "/api/v1/auth/token",
            "username=admin@test.com&password=wrong",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "AUTHENTICATION_REJECTED");
    assert!(json.get("token").is_none());
}

#[tokio::test]
async fn test_unknown_user_indistinguishable_from_wrong_password() {
    let (app, _) = test_app().await;

    let unknown = app
        .clone()
        .oneshot(form_request(
            "/api/v1/auth/token",
            "username=nobody@test.com&password=P@ss.W0rd",
        ))
        .await
        .unwrap();
    let wrong = app
        .oneshot(form_request(
            "/api/v1/auth/token",
            "username=admin@test.com&password=wrong",
        ))
        .await
        .unwrap();

    assert_eq!(unknown.status(), StatusCode::FORBIDDEN);
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);

    // Identical bodies: no user-existence oracle
    assert_eq!(body_json(unknown).await, body_json(wrong).await);
}

#[tokio::test]
async fn test_empty_username_is_bad_request() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(form_request(
            "/api/v1/auth/token",
            "username=&password=P@ss.W0rd",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Current Identity Tests
// =============================================================================

#[tokio::test]
async fn test_me_requires_token() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(get_request("/api/v1/auth/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_garbage_token() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(get_request("/api/v1/auth/me", Some("not.a.token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_rejects_tampered_token() {
    let (app, _) = test_app().await;
    let token = obtain_token(&app, "admin@test.com", "P@ss.W0rd").await;

    // Corrupt the signature segment
    let mut tampered = token.clone();
    let flip = if tampered.ends_with('A') { 'B' } else { 'A' };
    tampered.pop();
    tampered.push(flip);

    let response = app
        .oneshot(get_request("/api/v1/auth/me", Some(&tampered)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_projects_identity() {
    let (app, state) = test_app().await;

    // Scenario: alice with the single role "admin"
    state
        .store
        .add_user("alice", "Alice", "Liddell", "P@ss.W0rd", &["admin"])
        .await
        .unwrap();
    let token = obtain_token(&app, "alice", "P@ss.W0rd").await;

    let response = app
        .oneshot(get_request("/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["is_authenticated"], true);
    assert_eq!(json["name_claim_type"], "name");
    assert_eq!(json["role_claim_type"], "role");
    assert_eq!(json["token"], token.as_str());

    let claims = json["claims"].as_array().unwrap();
    // Name claim surfaces first
    assert_eq!(claims[0]["type"], "name");
    assert_eq!(claims[0]["value"], "alice");

    // Exactly one role claim, value "admin"
    let roles: Vec<&Value> = claims.iter().filter(|c| c["type"] == "role").collect();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["value"], "admin");
}

#[tokio::test]
async fn test_me_for_user_without_roles() {
    let (app, _) = test_app().await;
    let token = obtain_token(&app, "user@test.com", "P@ss.W0rd").await;

    let response = app
        .oneshot(get_request("/api/v1/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let claims = json["claims"].as_array().unwrap();
    assert!(claims.iter().all(|c| c["type"] != "role"));
    assert_eq!(claims[0]["value"], "user@test.com");
}
