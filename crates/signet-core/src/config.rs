//! Signet Configuration Management
//!
//! Handles configuration from environment variables and config files with
//! sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Development-only signing key; rejected by [`TokenConfig::validate`] when
/// `SIGNET_ENV=production`
pub const DEV_SIGNING_KEY: &str = "development-signing-key-change-in-production";

/// Minimum signing key length in bytes for HMAC-SHA256
pub const MIN_KEY_BYTES: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Token issuance and validation settings
    pub token: TokenConfig,

    /// Credential store settings
    pub store: StoreConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Token
        if let Ok(key) = std::env::var("SIGNET_TOKEN_KEY") {
            config.token.signing_key = key;
        }
        if let Ok(issuer) = std::env::var("SIGNET_TOKEN_ISSUER") {
            config.token.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("SIGNET_TOKEN_AUDIENCE") {
            config.token.audience = audience;
        }
        if let Ok(ttl) = std::env::var("SIGNET_TOKEN_TTL_SECS") {
            config.token.ttl_secs = ttl.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SIGNET_TOKEN_TTL_SECS".to_string(),
                value: ttl,
            })?;
        }

        // Store
        if let Ok(timeout) = std::env::var("SIGNET_STORE_TIMEOUT_SECS") {
            config.store.timeout_secs = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SIGNET_STORE_TIMEOUT_SECS".to_string(),
                value: timeout,
            })?;
        }
        if let Ok(seed) = std::env::var("SIGNET_SEED_DEMO_USERS") {
            config.store.seed_demo_users = matches!(seed.as_str(), "1" | "true" | "yes");
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Validate settings that must fail fast at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token.validate()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            // Empty by default; set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Token issuance and validation settings
///
/// The signing key is process-wide, read-only configuration. Rotating it
/// invalidates every outstanding token signed under the old key; Signet
/// keeps the TTL short instead of maintaining a revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Shared secret for HMAC-SHA256 signing (min 32 bytes)
    pub signing_key: String,

    /// Issuer identifier stamped into and required of every token
    pub issuer: String,

    /// Audience identifier stamped into and required of every token
    pub audience: String,

    /// Token time-to-live in seconds (default 43200 = 12 hours)
    pub ttl_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            signing_key: DEV_SIGNING_KEY.to_string(),
            issuer: "signet".to_string(),
            audience: "signet-clients".to_string(),
            ttl_secs: 43_200,
        }
    }
}

impl TokenConfig {
    /// Reject keys too short for the signing algorithm, and the development
    /// default key in production
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signing_key.len() < MIN_KEY_BYTES {
            return Err(ConfigError::InvalidValue {
                key: "SIGNET_TOKEN_KEY".to_string(),
                value: format!("{} bytes, need at least {MIN_KEY_BYTES}", self.signing_key.len()),
            });
        }
        let production = std::env::var("SIGNET_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);
        if production && self.signing_key == DEV_SIGNING_KEY {
            return Err(ConfigError::MissingRequired(
                "SIGNET_TOKEN_KEY (the development key is not allowed in production)".to_string(),
            ));
        }
        if self.ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SIGNET_TOKEN_TTL_SECS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Credential store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Upper bound on any single store operation, in seconds
    pub timeout_secs: u64,

    /// Create the demo accounts on startup when the store is empty
    pub seed_demo_users: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            seed_demo_users: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.token.ttl_secs, 43_200);
        assert_eq!(config.token.issuer, "signet");
        assert!(config.store.seed_demo_users);
    }

    #[test]
    fn test_default_token_config_validates() {
        // The dev key is long enough for HS256 and allowed outside production
        assert!(TokenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_signing_key_rejected() {
        let config = TokenConfig {
            signing_key: "too-short".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = TokenConfig {
            ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9090
            cors_origins = []

            [token]
            signing_key = "0123456789abcdef0123456789abcdef"
            issuer = "issuer-a"
            audience = "audience-b"
            ttl_secs = 3600

            [store]
            timeout_secs = 2
            seed_demo_users = false

            [logging]
            level = "debug"
            json_format = true
        "#;
        let config: AppConfig = ::toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.token.issuer, "issuer-a");
        assert_eq!(config.store.timeout_secs, 2);
        assert!(!config.store.seed_demo_users);
        assert!(config.validate().is_ok());
    }
}
