//! OpenAPI documentation
//!
//! Aggregates the handler annotations into one OpenAPI 3.0 document.
//! Swagger UI is served at `/swagger-ui`, the raw spec at
//! `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::user_info::{ClaimEntry, UserInfo};
use crate::error::ApiError;
use crate::handlers::auth::{AuthenticateRequest, AuthenticateResponse};
use crate::handlers::health::{HealthResponse, ReadinessChecks, ReadinessResponse};

/// Signet API documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Signet API",
        description = "Password authentication and signed bearer-token issuance.\n\n\
            Authenticate at `POST /api/v1/auth/token` with form-encoded \
            credentials, then pass the returned token as \
            `Authorization: Bearer <token>` to protected endpoints.",
        license(name = "Apache-2.0", url = "https://www.apache.org/licenses/LICENSE-2.0")
    ),
    paths(
        crate::handlers::auth::authenticate_handler,
        crate::handlers::auth::current_user_handler,
        crate::handlers::health::health_check,
        crate::handlers::health::readiness_check,
    ),
    components(schemas(
        AuthenticateRequest,
        AuthenticateResponse,
        UserInfo,
        ClaimEntry,
        ApiError,
        HealthResponse,
        ReadinessResponse,
        ReadinessChecks,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance and identity"),
        (name = "health", description = "Liveness and readiness probes"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/v1/auth/token"));
        assert!(json.contains("/api/v1/auth/me"));
        assert!(json.contains("bearer_auth"));
    }
}
