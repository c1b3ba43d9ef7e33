//! In-memory credential store
//!
//! The reference [`CredentialStore`] implementation: users and role
//! assignments held in process memory, passwords as Argon2id PHC strings.
//! Suitable for development and single-instance deployments; a database-
//! backed store implements the same trait.
//!
//! Usernames are matched case-insensitively, role order is the order of
//! assignment.

use super::password;
use signet_core::{CredentialStore, StoreError, StoredUser};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Password for the seeded demo accounts
pub const DEMO_PASSWORD: &str = "P@ss.W0rd";

#[derive(Default)]
pub struct MemoryCredentialStore {
    /// Keyed by lowercased username
    users: RwLock<HashMap<String, StoredUser>>,
    /// Ordered role names per user id
    roles: RwLock<HashMap<Uuid, Vec<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Create a user with the given roles, hashing the password
    ///
    /// Fails on a duplicate username. Duplicate role names are dropped,
    /// keeping first-assignment order.
    pub async fn add_user(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
        roles: &[&str],
    ) -> Result<StoredUser, StoreError> {
        let key = username.to_lowercase();
        let password_hash = password::hash_password(password)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(StoreError::Backend(format!(
                "username already exists: {username}"
            )));
        }

        let user = StoredUser::new(username, first_name, last_name, password_hash);

        let mut assigned: Vec<String> = Vec::with_capacity(roles.len());
        for role in roles {
            if !assigned.iter().any(|r| r == role) {
                assigned.push((*role).to_string());
            }
        }
        self.roles.write().await.insert(user.id, assigned);
        users.insert(key, user.clone());

        Ok(user)
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<StoredUser>, StoreError> {
        Ok(self.users.read().await.get(&name.to_lowercase()).cloned())
    }

    async fn verify_password(
        &self,
        user: &StoredUser,
        password: &str,
    ) -> Result<bool, StoreError> {
        password::verify_password(password, &user.password_hash)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn roles_of(&self, user: &StoredUser) -> Result<Vec<String>, StoreError> {
        Ok(self
            .roles
            .read()
            .await
            .get(&user.id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Create the demo accounts when the store is empty
///
/// Mirrors the sample data the service ships with: an administrator and a
/// plain user, both with [`DEMO_PASSWORD`]. Seeding failures are logged and
/// skipped, they never abort startup.
pub async fn seed_demo_users(store: &MemoryCredentialStore) {
    if !store.is_empty().await {
        return;
    }

    let accounts: [(&str, &str, &str, &[&str]); 2] = [
        ("admin@test.com", "Admin", "Account", &["Administrator"]),
        ("user@test.com", "Demo", "Account", &[]),
    ];

    for (username, first, last, roles) in accounts {
        match store
            .add_user(username, first, last, DEMO_PASSWORD, roles)
            .await
        {
            Ok(user) => {
                tracing::info!(username = %user.username, roles = ?roles, "seeded demo user")
            }
            Err(e) => tracing::error!("failed to seed demo user {username}: {e}"),
        }
    }
}
