//! Ambient HTTP middleware

pub mod security_headers;

pub use security_headers::security_headers_middleware;

use crate::state::AppState;
use axum::{body::Body, extract::Request, extract::State, middleware::Next, response::Response};
use std::sync::Arc;

/// Count every request for the metrics endpoint
pub async fn track_requests(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    state.increment_requests();
    next.run(request).await
}
