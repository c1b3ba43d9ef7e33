//! Credential verification against the external store
//!
//! Every store call runs under a bounded timeout; a store that hangs or
//! errors surfaces as [`AuthFailure::StoreUnavailable`], never as a bad
//! credential. Unknown usernames burn the cost of a real password
//! verification so the two rejection paths are indistinguishable from
//! outside.

use super::password;
use signet_core::{AuthFailure, CredentialStore, StoreError, StoredUser};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    timeout: Duration,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Check a presented username/password pair
    ///
    /// Returns the resolved user on a match. `NotFound` and
    /// `BadCredentials` are distinct here for the audit log; callers must
    /// present them as one uniform rejection.
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<StoredUser, AuthFailure> {
        if username.is_empty() {
            // No account can have an empty name; still do the work
            password::verify_against_dummy(password);
            return Err(AuthFailure::BadCredentials);
        }

        let user = self
            .bounded(self.store.find_user_by_name(username))
            .await?;

        let Some(user) = user else {
            password::verify_against_dummy(password);
            return Err(AuthFailure::NotFound);
        };

        let matches = self
            .bounded(self.store.verify_password(&user, password))
            .await?;

        if !matches {
            return Err(AuthFailure::BadCredentials);
        }

        Ok(user)
    }

    /// Ordered role names for a verified user, under the same timeout
    pub async fn roles_of(&self, user: &StoredUser) -> Result<Vec<String>, AuthFailure> {
        self.bounded(self.store.roles_of(user)).await
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, AuthFailure> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(AuthFailure::StoreUnavailable(format!(
                "store operation exceeded {:?}",
                self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::MemoryCredentialStore;

    const TIMEOUT: Duration = Duration::from_secs(5);

    async fn verifier_with_alice() -> CredentialVerifier {
        let store = MemoryCredentialStore::new();
        store
            .add_user("alice", "Alice", "Liddell", "P@ss.W0rd", &["admin"])
            .await
            .unwrap();
        CredentialVerifier::new(Arc::new(store), TIMEOUT)
    }

    #[tokio::test]
    async fn test_verify_success() {
        let verifier = verifier_with_alice().await;
        let user = verifier.verify("alice", "P@ss.W0rd").await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_is_bad_credentials() {
        let verifier = verifier_with_alice().await;
        let result = verifier.verify("alice", "wrong").await;
        assert!(matches!(result, Err(AuthFailure::BadCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let verifier = verifier_with_alice().await;
        let result = verifier.verify("mallory", "P@ss.W0rd").await;
        assert!(matches!(result, Err(AuthFailure::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_password_still_verified() {
        let verifier = verifier_with_alice().await;
        let result = verifier.verify("alice", "").await;
        assert!(matches!(result, Err(AuthFailure::BadCredentials)));
    }

    #[tokio::test]
    async fn test_empty_username_rejected_uniformly() {
        let verifier = verifier_with_alice().await;
        let result = verifier.verify("", "P@ss.W0rd").await;
        assert!(matches!(result, Err(AuthFailure::BadCredentials)));
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl CredentialStore for BrokenStore {
        async fn find_user_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<StoredUser>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn verify_password(
            &self,
            _user: &StoredUser,
            _password: &str,
        ) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn roles_of(&self, _user: &StoredUser) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_error_is_store_unavailable() {
        let verifier = CredentialVerifier::new(Arc::new(BrokenStore), TIMEOUT);
        let result = verifier.verify("alice", "P@ss.W0rd").await;
        assert!(matches!(result, Err(AuthFailure::StoreUnavailable(_))));
    }

    struct HangingStore;

    #[async_trait::async_trait]
    impl CredentialStore for HangingStore {
        async fn find_user_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<StoredUser>, StoreError> {
            std::future::pending().await
        }

        async fn verify_password(
            &self,
            _user: &StoredUser,
            _password: &str,
        ) -> Result<bool, StoreError> {
            std::future::pending().await
        }

        async fn roles_of(&self, _user: &StoredUser) -> Result<Vec<String>, StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_hanging_store_times_out() {
        let verifier =
            CredentialVerifier::new(Arc::new(HangingStore), Duration::from_millis(50));
        let result = verifier.verify("alice", "P@ss.W0rd").await;
        assert!(matches!(result, Err(AuthFailure::StoreUnavailable(_))));
    }
}
