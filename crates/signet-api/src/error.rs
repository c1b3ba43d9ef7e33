//! API error handling
//!
//! Maps internal failure taxonomies onto uniform HTTP responses. The two
//! credential rejections collapse into one 403 body with no detail, so the
//! API never acts as a user-existence oracle; store outages surface as 503.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use signet_core::AuthFailure;
use utoipa::ToSchema;

use crate::auth::IssueError;

/// API error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn authentication_rejected() -> Self {
        Self::new("AUTHENTICATION_REJECTED", "Authentication failed")
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED", "Authentication required")
    }

    pub fn store_unavailable() -> Self {
        Self::new("STORE_UNAVAILABLE", "Service temporarily unavailable")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn internal_error() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Credentials rejected; deliberately carries no detail
    AuthenticationRejected,
    /// Missing or invalid authentication on a protected route
    Unauthorized,
    /// Credential store errored or timed out
    StoreUnavailable(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::AuthenticationRejected => (
                StatusCode::FORBIDDEN,
                ApiError::authentication_rejected(),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ApiError::unauthorized()),
            AppError::StoreUnavailable(detail) => {
                tracing::error!("credential store unavailable: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ApiError::store_unavailable(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::bad_request(msg)),
            AppError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::internal_error(),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        match failure {
            // NotFound and BadCredentials are one visible outcome
            AuthFailure::NotFound | AuthFailure::BadCredentials => {
                AppError::AuthenticationRejected
            }
            AuthFailure::StoreUnavailable(reason) => AppError::StoreUnavailable(reason),
        }
    }
}

impl From<IssueError> for AppError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::Auth(failure) => failure.into(),
            IssueError::Token(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
