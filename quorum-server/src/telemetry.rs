//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ServerError, ServerResult};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "quorum_storage=debug,quorum_rpc=debug,info";

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Emit JSON lines instead of human readable output.
    pub json_logs: bool,
    /// `EnvFilter` directives.
    pub filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            filter: DEFAULT_FILTER.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Environment variables:
    /// - `QUORUM_LOG_JSON`: `true` or `1` for JSON output (default: false)
    /// - `RUST_LOG`: filter directives (default: [`DEFAULT_FILTER`])
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            json_logs: lookup("QUORUM_LOG_JSON")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
            filter: lookup("RUST_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }
}

/// Install the global tracing subscriber. Call once at startup.
pub fn init_tracing(config: &TelemetryConfig) -> ServerResult<()> {
    let env_filter = EnvFilter::try_new(&config.filter)
        .map_err(|e| ServerError::Telemetry(format!("Invalid filter {}: {}", config.filter, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    result.map_err(|e| ServerError::Telemetry(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(json = config.json_logs, filter = %config.filter, "Telemetry initialized");
    Ok(())
}
