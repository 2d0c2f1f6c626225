//! Configuration types
//!
//! Configuration is loaded from environment variables. Every loader is
//! written against a lookup function so tests do not touch process state.

use crate::ConfigError;
use std::time::Duration;

/// Number of proposals returned per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default timeout for record store round trips.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// INVENTORY CONFIGURATION
// ============================================================================

/// Inventory cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Maximum number of proposals per listing page.
    pub page_size: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl InventoryConfig {
    /// Create InventoryConfig from environment variables.
    ///
    /// Environment variables:
    /// - `QUORUM_PAGE_SIZE`: Proposals per listing page (default: 20)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create InventoryConfig from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_size = lookup("QUORUM_PAGE_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self { page_size }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

// ============================================================================
// RECORD STORE CONFIGURATION
// ============================================================================

/// Connection settings for the authoritative record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStoreConfig {
    /// Base URL of the record store, without trailing slash.
    pub base_url: String,
    /// Hex encoded ed25519 public key that signs challenge responses.
    pub identity: String,
    /// Basic auth user.
    pub user: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Timeout applied to every HTTP round trip.
    pub request_timeout: Duration,
}

impl RecordStoreConfig {
    /// Create a config with the required fields and default timeout.
    pub fn new(base_url: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            identity: identity.into(),
            user: None,
            password: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create RecordStoreConfig from environment variables.
    ///
    /// Environment variables:
    /// - `QUORUM_RECORDSTORE_URL`: Base URL (required)
    /// - `QUORUM_RECORDSTORE_IDENTITY`: Hex ed25519 public key (required)
    /// - `QUORUM_RECORDSTORE_USER`: Basic auth user
    /// - `QUORUM_RECORDSTORE_PASS`: Basic auth password
    /// - `QUORUM_RECORDSTORE_TIMEOUT_MS`: Request timeout (default: 30000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create RecordStoreConfig from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("QUORUM_RECORDSTORE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "QUORUM_RECORDSTORE_URL".to_string(),
            })?;

        let identity = lookup("QUORUM_RECORDSTORE_IDENTITY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "QUORUM_RECORDSTORE_IDENTITY".to_string(),
            })?;
        validate_identity(&identity)?;

        let request_timeout = match lookup("QUORUM_RECORDSTORE_TIMEOUT_MS") {
            Some(raw) => {
                let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    field: "QUORUM_RECORDSTORE_TIMEOUT_MS".to_string(),
                    value: raw.clone(),
                    reason: "must be a whole number of milliseconds".to_string(),
                })?;
                Duration::from_millis(millis)
            }
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let mut config = Self::new(base_url, identity);
        config.user = lookup("QUORUM_RECORDSTORE_USER").filter(|s| !s.is_empty());
        config.password = lookup("QUORUM_RECORDSTORE_PASS").filter(|s| !s.is_empty());
        config.request_timeout = request_timeout;
        Ok(config)
    }

    /// Set basic auth credentials.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn validate_identity(identity: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        field: "QUORUM_RECORDSTORE_IDENTITY".to_string(),
        value: identity.to_string(),
        reason: reason.to_string(),
    };

    let bytes = hex::decode(identity).map_err(|_| invalid("must be hex encoded"))?;
    if bytes.len() != 32 {
        return Err(invalid("must encode exactly 32 bytes"));
    }
    Ok(())
}
