//! Authentication API handlers
//!
//! The issuance endpoint takes form-encoded credentials and answers with
//! `{succeeded, token}`; the current-identity endpoint projects the
//! validated principal back to the caller.

use crate::audit::{audit_log, extract_ip_address, extract_user_agent, AuditEvent};
use crate::auth::{AuthenticatedPrincipal, IssueError, UserInfo};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Form, State},
    http::HeaderMap,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Credentials presented for token issuance (form-encoded)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthenticateRequest {
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    /// May be empty; verification still runs
    #[validate(length(max = 1024))]
    pub password: String,
}

/// Issuance outcome
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthenticateResponse {
    pub succeeded: bool,
    pub token: String,
}

/// Authenticate with username and password
///
/// Verifies the credentials and returns a signed bearer token. Unknown
/// users and wrong passwords produce the same 403 response; the distinction
/// exists only in the audit log.
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "auth",
    request_body(
        content = AuthenticateRequest,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Token issued", body = AuthenticateResponse),
        (status = 400, description = "Malformed request", body = crate::error::ApiError),
        (status = 403, description = "Authentication rejected", body = crate::error::ApiError),
        (status = 503, description = "Credential store unavailable", body = crate::error::ApiError),
    )
)]
pub async fn authenticate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(request): Form<AuthenticateRequest>,
) -> Result<impl IntoResponse, AppError> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let ip_address = extract_ip_address(&headers);
    let user_agent = extract_user_agent(&headers);

    match state.auth.issue(&request.username, &request.password).await {
        Ok(issued) => {
            audit_log(&AuditEvent::TokenIssued {
                user_id: issued.user.id,
                username: issued.user.username.clone(),
                expires_at: issued.expires_at,
                ip_address,
                user_agent,
            });

            Ok(Json(AuthenticateResponse {
                succeeded: true,
                token: issued.token,
            }))
        }
        Err(IssueError::Auth(failure)) if failure.is_rejection() => {
            audit_log(&AuditEvent::AuthenticationRejected {
                username: request.username.clone(),
                reason: failure.to_string(),
                ip_address,
                user_agent,
            });
            Err(AppError::AuthenticationRejected)
        }
        Err(e) => {
            if let IssueError::Auth(signet_core::AuthFailure::StoreUnavailable(reason)) = &e {
                audit_log(&AuditEvent::StoreUnavailable {
                    operation: "issue".to_string(),
                    reason: reason.clone(),
                });
            }
            Err(e.into())
        }
    }
}

/// Get the current identity
///
/// Requires a valid bearer token; returns the UserInfo snapshot with the
/// name claims first, then the remaining claims in token order.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current identity", body = UserInfo),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn current_user_handler(
    principal: Option<Extension<AuthenticatedPrincipal>>,
) -> Json<UserInfo> {
    match principal {
        Some(Extension(principal)) => Json(UserInfo::project(
            true,
            &principal.claims,
            &principal.token,
        )),
        // Unreachable behind the auth middleware, kept as the projection
        // contract demands: no principal means the anonymous identity
        None => Json(UserInfo::anonymous()),
    }
}
