//! Enum types for proposal records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RECORD STATUS
// ============================================================================

/// Status of a record as reported by the record store.
///
/// Serialized as the store's integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecordStatus {
    Invalid,
    NotFound,
    NotReviewed,
    Censored,
    Public,
    UnreviewedChanges,
    Archived,
}

impl RecordStatus {
    /// Integer code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            RecordStatus::Invalid => 0,
            RecordStatus::NotFound => 1,
            RecordStatus::NotReviewed => 2,
            RecordStatus::Censored => 3,
            RecordStatus::Public => 4,
            RecordStatus::UnreviewedChanges => 5,
            RecordStatus::Archived => 6,
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: u8) -> Result<Self, RecordStatusParseError> {
        match code {
            0 => Ok(RecordStatus::Invalid),
            1 => Ok(RecordStatus::NotFound),
            2 => Ok(RecordStatus::NotReviewed),
            3 => Ok(RecordStatus::Censored),
            4 => Ok(RecordStatus::Public),
            5 => Ok(RecordStatus::UnreviewedChanges),
            6 => Ok(RecordStatus::Archived),
            other => Err(RecordStatusParseError(other)),
        }
    }
}

impl TryFrom<u8> for RecordStatus {
    type Error = RecordStatusParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl From<RecordStatus> for u8 {
    fn from(value: RecordStatus) -> Self {
        value.code()
    }
}

/// Error when decoding an unknown record status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStatusParseError(pub u8);

impl fmt::Display for RecordStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid record status code: {}", self.0)
    }
}

impl std::error::Error for RecordStatusParseError {}

// ============================================================================
// PROPOSAL STATUS, STATE, AND BUCKET
// ============================================================================

/// Service-level status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Invalid,
    NotFound,
    NotReviewed,
    UnreviewedChanges,
    Censored,
    Public,
    Abandoned,
}

impl From<RecordStatus> for ProposalStatus {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Invalid => ProposalStatus::Invalid,
            RecordStatus::NotFound => ProposalStatus::NotFound,
            RecordStatus::NotReviewed => ProposalStatus::NotReviewed,
            RecordStatus::Censored => ProposalStatus::Censored,
            RecordStatus::Public => ProposalStatus::Public,
            RecordStatus::UnreviewedChanges => ProposalStatus::UnreviewedChanges,
            RecordStatus::Archived => ProposalStatus::Abandoned,
        }
    }
}

impl ProposalStatus {
    /// The counter bucket this status is tallied under.
    pub fn bucket(self) -> StatusBucket {
        match self {
            ProposalStatus::Invalid | ProposalStatus::NotFound => StatusBucket::Invalid,
            ProposalStatus::NotReviewed => StatusBucket::Unvetted,
            ProposalStatus::UnreviewedChanges => StatusBucket::UnvettedChanges,
            ProposalStatus::Censored => StatusBucket::Censored,
            ProposalStatus::Public => StatusBucket::Public,
            ProposalStatus::Abandoned => StatusBucket::Abandoned,
        }
    }

    /// The visibility class this status belongs to.
    pub fn state(self) -> ProposalState {
        match self {
            ProposalStatus::NotReviewed
            | ProposalStatus::UnreviewedChanges
            | ProposalStatus::Censored => ProposalState::Unvetted,
            ProposalStatus::Public | ProposalStatus::Abandoned => ProposalState::Vetted,
            ProposalStatus::Invalid | ProposalStatus::NotFound => ProposalState::Invalid,
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ProposalStatus::Invalid => "invalid",
            ProposalStatus::NotFound => "not found",
            ProposalStatus::NotReviewed => "not reviewed",
            ProposalStatus::UnreviewedChanges => "unreviewed changes",
            ProposalStatus::Censored => "censored",
            ProposalStatus::Public => "public",
            ProposalStatus::Abandoned => "abandoned",
        };
        f.write_str(value)
    }
}

/// Visibility class of a proposal, used to filter listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    Invalid,
    Unvetted,
    Vetted,
}

/// Counter bucket for inventory statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusBucket {
    Invalid,
    Censored,
    Unvetted,
    UnvettedChanges,
    Public,
    Abandoned,
}

impl StatusBucket {
    /// Every bucket, in reporting order.
    pub const ALL: [StatusBucket; 6] = [
        StatusBucket::Invalid,
        StatusBucket::Censored,
        StatusBucket::Unvetted,
        StatusBucket::UnvettedChanges,
        StatusBucket::Public,
        StatusBucket::Abandoned,
    ];
}

// ============================================================================
// VOTE ACTION
// ============================================================================

/// A like (+1) or dislike (-1) on a comment.
///
/// The record store carries actions as the strings `"1"` and `"-1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VoteAction {
    Up,
    Down,
}

impl VoteAction {
    /// Signed weight of the action.
    pub fn weight(self) -> i64 {
        match self {
            VoteAction::Up => 1,
            VoteAction::Down => -1,
        }
    }

    fn as_wire_str(self) -> &'static str {
        match self {
            VoteAction::Up => "1",
            VoteAction::Down => "-1",
        }
    }
}

impl fmt::Display for VoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl FromStr for VoteAction {
    type Err = VoteActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "+1" => Ok(VoteAction::Up),
            "-1" => Ok(VoteAction::Down),
            other => Err(VoteActionParseError(other.to_string())),
        }
    }
}

impl TryFrom<String> for VoteAction {
    type Error = VoteActionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VoteAction> for String {
    fn from(value: VoteAction) -> Self {
        value.as_wire_str().to_string()
    }
}

/// Error when parsing an invalid vote action string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteActionParseError(pub String);

impl fmt::Display for VoteActionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid vote action: {}", self.0)
    }
}

impl std::error::Error for VoteActionParseError {}
