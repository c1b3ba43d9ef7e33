//! Authentication middleware for protecting routes
//!
//! Extracts the bearer token from the Authorization header, validates it
//! through the shared [`AuthService`], and adds the resulting
//! [`AuthenticatedPrincipal`] to request extensions. Which validation layer
//! failed goes to the audit log only; every rejection looks the same to the
//! caller.

use super::token::ValidationFailure;
use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use signet_core::{ClaimKind, ClaimSet};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// The identity validated for the current request
///
/// Derived entirely from the token's claims; the store is not consulted
/// during validation. Carries the full claim set and the raw token so the
/// current-identity endpoint can project them without re-validating.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    /// Subject id from the token (nil when the claim is absent or not a
    /// UUID, which issued tokens never are)
    pub subject: Uuid,
    /// Login name
    pub username: String,
    /// Role memberships, in claim order
    pub roles: Vec<String>,
    /// Every claim the token carried, in order
    pub claims: ClaimSet,
    /// The raw presented token
    pub token: String,
}

impl AuthenticatedPrincipal {
    pub fn from_claims(claims: ClaimSet, token: String) -> Self {
        let subject = claims
            .subject()
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::nil);
        let username = claims.name().unwrap_or_default().to_string();
        let roles = claims
            .values_of(&ClaimKind::Role)
            .map(|r| r.to_string())
            .collect();

        Self {
            subject,
            username,
            roles,
            claims,
            token,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] ValidationFailure),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // One uniform body for all token failures; the specific layer is
        // audit-logged, never echoed
        let message = match self {
            AuthError::MissingAuthHeader => "Missing Authorization header",
            AuthError::InvalidAuthHeader => "Invalid Authorization header format",
            AuthError::InvalidToken(_) => "Invalid or expired token",
        };

        let body = serde_json::json!({
            "error": message,
            "status": StatusCode::UNAUTHORIZED.as_u16(),
        });

        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Require a valid bearer token
///
/// 1. Extracts the Authorization header
/// 2. Checks the Bearer scheme
/// 3. Validates signature, issuer, audience, and temporal validity
/// 4. Adds [`AuthenticatedPrincipal`] to request extensions
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ip_address = extract_ip_address(request.headers());
    let user_agent = extract_user_agent(request.headers());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = match state.auth.validate(token) {
        Ok(claims) => claims,
        Err(failure) => {
            audit_log(&AuditEvent::InvalidToken {
                reason: failure.to_string(),
                ip_address,
                user_agent,
            });
            return Err(AuthError::InvalidToken(failure));
        }
    };

    let principal = AuthenticatedPrincipal::from_claims(claims, token.to_string());
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
