//! Authentication service layer
//!
//! Orchestrates the issuance pipeline (verify credentials, resolve roles,
//! assemble claims, sign) and the validation pipeline (verify token,
//! reconstruct claims). Holds no mutable state: every call is a pure
//! function of the verified user, the current time, and the configuration.

use super::token::{self, EncodeError, ValidationFailure};
use super::verifier::CredentialVerifier;
use chrono::Utc;
use signet_core::{AuthFailure, ClaimSet, CredentialStore, StoredUser, TokenConfig};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Issuance failures
///
/// Keeps authentication rejection apart from internal signing failure so
/// the HTTP layer can map them to 403 and 500 respectively.
#[derive(Debug, Error)]
pub enum IssueError {
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error(transparent)]
    Token(#[from] EncodeError),
}

/// A freshly issued token plus the identity it was issued to
///
/// The identity is for server-side audit logging only; the token string is
/// the caller-visible artifact.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
    pub user: StoredUser,
}

pub struct AuthService {
    verifier: CredentialVerifier,
    config: TokenConfig,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        config: TokenConfig,
        store_timeout: Duration,
    ) -> Self {
        Self {
            verifier: CredentialVerifier::new(store, store_timeout),
            config,
        }
    }

    /// Authenticate a username/password pair and issue a signed token
    ///
    /// Claim assembly order: subject id, name, display name, then one role
    /// claim per distinct role in store order. An empty role set is valid.
    /// Any [`AuthFailure`] propagates unchanged; callers collapse
    /// `NotFound`/`BadCredentials` into one visible outcome.
    pub async fn issue(&self, username: &str, password: &str) -> Result<IssuedToken, IssueError> {
        let user = self.verifier.verify(username, password).await?;
        let roles = self.verifier.roles_of(&user).await?;

        let claims = ClaimSet::for_identity(user.id, &user.username, &user.display_name(), &roles);

        let now = Utc::now().timestamp();
        let expires_at = now + self.config.ttl_secs as i64;
        let token = token::encode(
            &claims,
            &self.config.issuer,
            &self.config.audience,
            now,
            expires_at,
            self.config.signing_key.as_bytes(),
        )?;

        Ok(IssuedToken {
            token,
            expires_at,
            user,
        })
    }

    /// Validate a presented token at the current time
    pub fn validate(&self, token: &str) -> Result<ClaimSet, ValidationFailure> {
        token::decode(
            token,
            &self.config.issuer,
            &self.config.audience,
            self.config.signing_key.as_bytes(),
            Utc::now().timestamp(),
        )
    }

    pub fn token_config(&self) -> &TokenConfig {
        &self.config
    }
}
