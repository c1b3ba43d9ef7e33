//! Signet Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout Signet:
//! - Claims and claim sets carried inside issued tokens
//! - The stored-user model and the credential store trait
//! - Authentication failure taxonomy
//! - Configuration management

pub mod claims;
pub mod config;

pub use claims::{Claim, ClaimKind, ClaimSet};
pub use config::{AppConfig, ConfigError, ServerConfig, StoreConfig, TokenConfig};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Why an authentication attempt was not granted
///
/// `NotFound` and `BadCredentials` must collapse to one externally-visible
/// outcome; keeping them separate internally lets the audit log record which
/// check failed without handing callers a user-enumeration oracle.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("user not found")]
    NotFound,

    #[error("invalid credentials")]
    BadCredentials,

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AuthFailure {
    /// True for the failures callers must see as one uniform rejection
    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthFailure::NotFound | AuthFailure::BadCredentials)
    }
}

impl From<StoreError> for AuthFailure {
    fn from(err: StoreError) -> Self {
        AuthFailure::StoreUnavailable(err.to_string())
    }
}

/// Credential store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, AuthFailure>;

// ============================================================================
// Stored User
// ============================================================================

/// A user record as the credential store sees it
///
/// The password hash is opaque verification material (a PHC string); nothing
/// outside the store interprets it. Role membership is not carried here, it
/// is resolved separately through [`CredentialStore::roles_of`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    /// Unique user identifier
    pub id: Uuid,

    /// Login name (unique within the store)
    pub username: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Password verification material, never serialized in API responses
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }

    /// Display name surfaced in the display-name claim
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// External credential store collaborator
///
/// The authentication core is read-only against this interface; user and
/// role administration happen elsewhere. Implementations may block on I/O;
/// callers wrap every invocation in a bounded timeout.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by login name
    async fn find_user_by_name(
        &self,
        name: &str,
    ) -> std::result::Result<Option<StoredUser>, StoreError>;

    /// Check a plaintext password against the user's stored material
    async fn verify_password(
        &self,
        user: &StoredUser,
        password: &str,
    ) -> std::result::Result<bool, StoreError>;

    /// Ordered, distinct role names assigned to the user
    async fn roles_of(&self, user: &StoredUser) -> std::result::Result<Vec<String>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let user = StoredUser::new("alberto", "moreno", "simon", "$argon2id$...");
        assert_eq!(user.display_name(), "moreno simon");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = StoredUser::new("alice", "Alice", "Liddell", "secret-hash");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }

    #[test]
    fn test_auth_failure_rejection_classes() {
        assert!(AuthFailure::NotFound.is_rejection());
        assert!(AuthFailure::BadCredentials.is_rejection());
        assert!(!AuthFailure::StoreUnavailable("down".to_string()).is_rejection());
    }

    #[test]
    fn test_store_error_maps_to_unavailable() {
        let failure: AuthFailure = StoreError::Backend("connection reset".to_string()).into();
        assert!(matches!(failure, AuthFailure::StoreUnavailable(_)));
    }
}
