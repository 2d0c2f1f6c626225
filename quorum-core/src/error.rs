//! Error types for Quorum operations

use crate::{CommentId, Token};
use std::time::Duration;
use thiserror::Error;

/// Inventory cache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Inventory record not found: {token}")]
    NotFound { token: Token },

    #[error("Comment not found: {token}: {comment_id}")]
    CommentNotFound { token: Token, comment_id: CommentId },

    #[error("Duplicate token: {token}")]
    DuplicateToken { token: Token },

    #[error("Inventory lock poisoned")]
    LockPoisoned,
}

/// Failure to decode one metadata stream of one record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Could not decode metadata stream {stream_id} of {token}: {reason}")]
pub struct DecodeError {
    pub stream_id: u64,
    pub token: Token,
    pub reason: String,
}

/// Record store RPC errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("Challenge verification failed: {reason}")]
    ChallengeVerificationFailure { reason: String },

    #[error("Transport error: {reason}")]
    Transport { reason: String },

    #[error("Record store returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from record store: {reason}")]
    InvalidResponse { reason: String },

    #[error("Deadline of {timeout:?} exceeded for {operation}")]
    DeadlineExceeded {
        operation: String,
        timeout: Duration,
    },

    #[error("Could not encode request: {reason}")]
    Encode { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Quorum errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuorumError {
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Quorum operations.
pub type QuorumResult<T> = Result<T, QuorumError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_error_display_not_found() {
        let err = InventoryError::NotFound {
            token: Token::from("abc"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("not found"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_inventory_error_display_duplicate() {
        let err = InventoryError::DuplicateToken {
            token: Token::from("dup"),
        };
        assert!(format!("{}", err).contains("Duplicate token: dup"));
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError {
            stream_id: 13,
            token: Token::from("t1"),
            reason: "expected value".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("13"));
        assert!(msg.contains("t1"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn test_rpc_error_display_deadline() {
        let err = RpcError::DeadlineExceeded {
            operation: "getcomments".to_string(),
            timeout: Duration::from_millis(250),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("getcomments"));
        assert!(msg.contains("250ms"));
    }

    #[test]
    fn test_quorum_error_from_variants() {
        let inventory = QuorumError::from(InventoryError::LockPoisoned);
        assert!(matches!(inventory, QuorumError::Inventory(_)));

        let rpc = QuorumError::from(RpcError::ChallengeVerificationFailure {
            reason: "bad signature".to_string(),
        });
        assert!(matches!(rpc, QuorumError::Rpc(_)));

        let config = QuorumError::from(ConfigError::MissingRequired {
            field: "base_url".to_string(),
        });
        assert!(matches!(config, QuorumError::Config(_)));

        let decode = QuorumError::from(DecodeError {
            stream_id: 0,
            token: Token::default(),
            reason: String::new(),
        });
        assert!(matches!(decode, QuorumError::Decode(_)));
    }
}
