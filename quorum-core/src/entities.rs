//! Record, metadata, comment, and proposal view types.
//!
//! Wire field names follow the record store's JSON encoding (lowercase,
//! no separators), so each multi-word field carries an explicit rename.

use crate::{
    CommentId, ProposalState, ProposalStatus, PublicKey, RecordStatus, Token, UnixTimestamp,
    UserId, VoteAction,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// RECORDS
// ============================================================================

/// Proof of record acceptance issued by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CensorshipRecord {
    pub token: Token,
    pub merkle: String,
    pub signature: String,
}

/// A metadata stream attached to a record.
///
/// The payload holds zero or more concatenated JSON values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataStream {
    pub id: u64,
    pub payload: String,
}

impl MetadataStream {
    pub fn new(id: u64, payload: impl Into<String>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }
}

/// Snapshot of one record as held by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub status: RecordStatus,
    pub timestamp: UnixTimestamp,
    #[serde(rename = "censorshiprecord")]
    pub censorship_record: CensorshipRecord,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: Vec<MetadataStream>,
}

impl Record {
    /// Token of this record.
    pub fn token(&self) -> &Token {
        &self.censorship_record.token
    }

    /// Service-level status derived from the record status.
    pub fn proposal_status(&self) -> ProposalStatus {
        ProposalStatus::from(self.status)
    }
}

// ============================================================================
// DECODED METADATA
// ============================================================================

/// Proposal level metadata from the general stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalMetadata {
    pub version: u64,
    pub timestamp: UnixTimestamp,
    pub name: String,
    #[serde(rename = "publickey")]
    pub public_key: PublicKey,
    pub signature: String,
}

/// One entry of the status change history stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    #[serde(default)]
    pub version: u64,
    #[serde(rename = "adminpubkey", default)]
    pub admin_pubkey: PublicKey,
    #[serde(rename = "newstatus")]
    pub new_status: RecordStatus,
    #[serde(
        rename = "statuschangemessage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub status_change_message: Option<String>,
    pub timestamp: UnixTimestamp,
}

/// Permission to start voting on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteAuthorization {
    pub action: String,
    #[serde(rename = "recordversion")]
    pub record_version: String,
    pub receipt: String,
    pub timestamp: UnixTimestamp,
}

/// One choice on a ballot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VoteOption {
    pub id: String,
    pub description: String,
    pub bits: u64,
}

/// Voting parameters chosen for a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vote {
    pub token: Token,
    pub mask: u64,
    pub duration: u32,
    #[serde(rename = "quorumpercentage")]
    pub quorum_percentage: u32,
    #[serde(rename = "passpercentage")]
    pub pass_percentage: u32,
    pub options: Vec<VoteOption>,
}

/// Signed request that started a vote (the vote configuration).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartVote {
    pub version: u64,
    #[serde(rename = "publickey")]
    pub public_key: PublicKey,
    pub vote: Vote,
    pub signature: String,
}

/// Snapshot taken when voting started (the vote outcome stream).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartVoteReply {
    pub version: u64,
    #[serde(rename = "startblockheight")]
    pub start_block_height: String,
    #[serde(rename = "startblockhash")]
    pub start_block_hash: String,
    #[serde(rename = "endheight")]
    pub end_height: String,
    #[serde(rename = "eligibletickets")]
    pub eligible_tickets: Vec<String>,
}

// ============================================================================
// COMMENTS
// ============================================================================

/// A comment on a proposal.
///
/// `up_votes` and `down_votes` are derived from the proposal's like events
/// and are overwritten every time the tally runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comment {
    pub token: Token,
    #[serde(rename = "parentid", default)]
    pub parent_id: CommentId,
    #[serde(rename = "comment", default)]
    pub content: String,
    #[serde(default)]
    pub signature: String,
    #[serde(rename = "publickey", default)]
    pub public_key: PublicKey,
    #[serde(rename = "commentid")]
    pub comment_id: CommentId,
    #[serde(default)]
    pub receipt: String,
    #[serde(default)]
    pub timestamp: UnixTimestamp,
    #[serde(default)]
    pub censored: bool,
    #[serde(rename = "upvotes", default)]
    pub up_votes: u64,
    #[serde(rename = "downvotes", default)]
    pub down_votes: u64,
}

impl Comment {
    /// Number of users with a standing vote on this comment.
    pub fn total_votes(&self) -> u64 {
        self.up_votes + self.down_votes
    }

    /// Net score of this comment.
    pub fn result_votes(&self) -> i64 {
        self.up_votes as i64 - self.down_votes as i64
    }
}

/// A raw like or dislike event on a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeEvent {
    pub token: Token,
    #[serde(rename = "commentid")]
    pub comment_id: CommentId,
    pub action: VoteAction,
    #[serde(default)]
    pub signature: String,
    #[serde(rename = "publickey")]
    pub public_key: PublicKey,
    #[serde(default)]
    pub receipt: String,
    #[serde(default)]
    pub timestamp: UnixTimestamp,
}

// ============================================================================
// PROPOSAL VIEW
// ============================================================================

/// Denormalized, caller-owned view of one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub name: String,
    pub state: ProposalState,
    pub status: ProposalStatus,
    pub timestamp: UnixTimestamp,
    #[serde(rename = "userid", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "publickey")]
    pub public_key: PublicKey,
    pub signature: String,
    pub version: String,
    #[serde(rename = "censorshiprecord")]
    pub censorship_record: CensorshipRecord,
    #[serde(rename = "numcomments")]
    pub num_comments: usize,
    pub changes: Vec<StatusChange>,
    #[serde(rename = "voteauthorization", skip_serializing_if = "Option::is_none")]
    pub vote_authorization: Option<VoteAuthorization>,
    #[serde(rename = "votebits", skip_serializing_if = "Option::is_none")]
    pub vote_config: Option<StartVote>,
    #[serde(rename = "voting", skip_serializing_if = "Option::is_none")]
    pub vote_outcome: Option<StartVoteReply>,
}

impl ProposalRecord {
    /// Token of the proposal.
    pub fn token(&self) -> &Token {
        &self.censorship_record.token
    }
}
