//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_API_BASE_URL` - Base URL of the stock and catalog API (default: `http://localhost:3333`)
//! - `CART_API_TOKEN` - Bearer token sent to the API
//! - `CART_STORAGE_DIR` - Directory holding the persisted cart (default: `.rocketshoes`)
//! - `CART_STORAGE_KEY` - Storage key for the cart (default: `@RocketShoes:cart`)
//! - `CART_CATALOG_CACHE_TTL_SECS` - Catalog response cache lifetime (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::storage::CartStorage;

const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Stock and catalog API configuration
    pub api: ApiConfig,
    /// Persistent cart storage configuration
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Stock and catalog API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// How long catalog responses stay cached
    pub catalog_cache_ttl: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

/// Persistent cart storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory for the file-backed store
    pub dir: PathBuf,
    /// Key the cart is stored under
    pub key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_or_default(&lookup, "CART_API_BASE_URL", DEFAULT_API_BASE_URL);
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("CART_API_BASE_URL".to_string(), e.to_string())
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "CART_API_BASE_URL".to_string(),
                format!("unsupported scheme '{}'", base_url.scheme()),
            ));
        }

        let ttl_secs = get_or_default(
            &lookup,
            "CART_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CART_CATALOG_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        let key = get_or_default(&lookup, "CART_STORAGE_KEY", CartStorage::DEFAULT_KEY);
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api: ApiConfig {
                base_url,
                token: get_optional(&lookup, "CART_API_TOKEN").map(SecretString::from),
                catalog_cache_ttl: Duration::from_secs(ttl_secs),
            },
            storage: StorageConfig {
                dir: PathBuf::from(get_or_default(&lookup, "CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
                key,
            },
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}
