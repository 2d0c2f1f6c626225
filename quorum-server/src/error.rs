//! Startup errors.

use quorum_core::{ConfigError, QuorumError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Quorum(#[from] QuorumError),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;
