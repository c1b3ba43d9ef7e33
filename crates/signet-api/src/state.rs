//! Application state management

use crate::auth::{AuthService, MemoryCredentialStore};
use signet_core::config::AppConfig;
use signet_core::CredentialStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Application state shared across handlers
///
/// Everything here is read-only or atomic; requests share no other state.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Issuance/validation pipeline
    pub auth: AuthService,
    /// Credential store handle, kept concrete for seeding and probes
    pub store: Arc<MemoryCredentialStore>,
}

impl AppState {
    /// Create new application state with config
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(MemoryCredentialStore::new());
        let auth = AuthService::new(
            store.clone() as Arc<dyn CredentialStore>,
            config.token.clone(),
            Duration::from_secs(config.store.timeout_secs),
        );

        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            auth,
            store,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Cheap store probe for the readiness endpoint
    pub async fn store_healthy(&self) -> bool {
        self.store
            .find_user_by_name("__readiness_probe__")
            .await
            .is_ok()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
