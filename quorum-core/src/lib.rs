//! Quorum Core - Proposal Inventory Types
//!
//! Pure data structures with no behavior beyond conversions. All other crates
//! depend on this. The cache, the record store client, and the test utilities
//! share these definitions.

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;

pub use config::{InventoryConfig, RecordStoreConfig, DEFAULT_PAGE_SIZE};
pub use entities::{
    CensorshipRecord, Comment, LikeEvent, MetadataStream, ProposalMetadata, ProposalRecord,
    Record, StartVote, StartVoteReply, StatusChange, Vote, VoteAuthorization, VoteOption,
};
pub use enums::{
    ProposalState, ProposalStatus, RecordStatus, RecordStatusParseError, StatusBucket, VoteAction,
    VoteActionParseError,
};
pub use error::{
    ConfigError, DecodeError, InventoryError, QuorumError, QuorumResult, RpcError,
};

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Hex encoded public key of a proposal author, comment author, or voter.
pub type PublicKey = String;

/// Identifier of a user account in the external user directory.
pub type UserId = String;

/// Identifier of a comment, unique within one proposal.
pub type CommentId = String;

/// Unix timestamp in seconds, as carried by the record store.
pub type UnixTimestamp = i64;

/// Record token assigned by the record store at creation.
///
/// Tokens are opaque, globally unique, and immutable. They are the primary
/// key of every inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the token is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the token, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
