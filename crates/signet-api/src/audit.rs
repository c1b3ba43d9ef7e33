//! Security audit logging for authentication events
//!
//! Structured records for every authentication-relevant outcome: tokens
//! issued, credentials rejected, invalid tokens presented, store outages.
//! Events are logged at INFO level under the "audit" target so they can be
//! filtered and routed to security monitoring separately from application
//! logs.
//!
//! The rejection *reason* lives only here; HTTP responses stay uniform.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Authentication audit events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A token was issued to a verified user
    TokenIssued {
        user_id: Uuid,
        username: String,
        expires_at: i64,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Credentials were rejected (unknown user or wrong password; the
    /// distinction is recorded here and nowhere else)
    AuthenticationRejected {
        username: String,
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// A protected route was hit with a token that failed validation
    InvalidToken {
        reason: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// The credential store errored or timed out
    StoreUnavailable {
        operation: String,
        reason: String,
    },
}

/// Emit an audit event
pub fn audit_log(event: &AuditEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!(target: "audit", event = %json),
        Err(e) => info!(target: "audit", "failed to serialize audit event: {e}"),
    }
}

/// Client IP from proxy headers, if present
pub fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        })
}

/// User-agent header, if present
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::AuthenticationRejected {
            username: "alice".to_string(),
            reason: "invalid credentials".to_string(),
            ip_address: Some("192.168.1.1".to_string()),
            user_agent: None,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"authentication_rejected\""));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_extract_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.0.0.1, 10.0.0.2"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.3"));

        assert_eq!(extract_ip_address(&headers), Some("10.0.0.1".to_string()));
    }

    #[test]
    fn test_extract_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.3"));

        assert_eq!(extract_ip_address(&headers), Some("10.0.0.3".to_string()));
        assert_eq!(extract_user_agent(&headers), None);
    }
}
