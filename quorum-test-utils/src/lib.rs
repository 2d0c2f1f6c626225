//! Quorum Test Utilities
//!
//! Shared test infrastructure for the Quorum workspace:
//! - A mock record store that signs challenges like the real one
//! - Proptest generators for records and like events
//! - Fixtures for records, metadata payloads, comments, and likes
//! - Assertions for Quorum error variants and counter consistency

pub use quorum_core::{
    CensorshipRecord, Comment, ConfigError, InventoryError, LikeEvent, MetadataStream,
    ProposalState, ProposalStatus, QuorumError, QuorumResult, Record, RecordStatus, RpcError,
    Token, VoteAction,
};
pub use quorum_rpc::{RecordStore, ServerIdentity};
pub use quorum_storage::{Inventory, ProposalStats};

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use quorum_rpc::{
    Challenge, GetComments, GetCommentsReply, GetProposalCommentsLikes,
    GetProposalCommentsLikesReply, InventoryReply, InventoryRequest, PluginCommand,
    PluginCommandReply, CMD_GET_COMMENTS, CMD_PROPOSAL_COMMENTS_LIKES, PLUGIN_ID,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// MOCK RECORD STORE
// ============================================================================

/// In-memory record store that answers challenges with an ed25519 key.
///
/// Configure it with the builder methods, then wrap it in an `Arc`.
pub struct MockRecordStore {
    identity_key: SigningKey,
    signing_key: SigningKey,
    vetted: Vec<Record>,
    branches: Vec<Record>,
    raw_vetted: Vec<serde_json::Value>,
    comments: HashMap<Token, Vec<Comment>>,
    likes: HashMap<Token, Vec<LikeEvent>>,
    failing: HashSet<Token>,
    plugin_calls: AtomicUsize,
}

impl MockRecordStore {
    /// A store whose identity key is derived from `seed`.
    pub fn new(seed: u8) -> Self {
        let key = fixtures::signing_key(seed);
        Self {
            identity_key: key.clone(),
            signing_key: key,
            vetted: Vec::new(),
            branches: Vec::new(),
            raw_vetted: Vec::new(),
            comments: HashMap::new(),
            likes: HashMap::new(),
            failing: HashSet::new(),
            plugin_calls: AtomicUsize::new(0),
        }
    }

    /// The identity clients should trust.
    pub fn identity(&self) -> ServerIdentity {
        ServerIdentity::new(self.identity_key.verifying_key())
    }

    /// Sign replies with a key other than the advertised identity.
    pub fn impersonated_by(mut self, seed: u8) -> Self {
        self.signing_key = fixtures::signing_key(seed);
        self
    }

    pub fn with_vetted(mut self, records: Vec<Record>) -> Self {
        self.vetted.extend(records);
        self
    }

    /// Append a vetted entry exactly as given, even if it is not a valid record.
    pub fn with_raw_vetted(mut self, value: serde_json::Value) -> Self {
        self.raw_vetted.push(value);
        self
    }

    pub fn with_branches(mut self, records: Vec<Record>) -> Self {
        self.branches.extend(records);
        self
    }

    pub fn with_comments(mut self, token: impl Into<Token>, comments: Vec<Comment>) -> Self {
        self.comments.entry(token.into()).or_default().extend(comments);
        self
    }

    pub fn with_likes(mut self, token: impl Into<Token>, likes: Vec<LikeEvent>) -> Self {
        self.likes.entry(token.into()).or_default().extend(likes);
        self
    }

    /// Make every plugin command for `token` fail with a server error.
    pub fn failing_for(mut self, token: impl Into<Token>) -> Self {
        self.failing.insert(token.into());
        self
    }

    pub fn plugin_calls(&self) -> usize {
        self.plugin_calls.load(Ordering::SeqCst)
    }

    fn sign(&self, challenge_hex: &str) -> QuorumResult<String> {
        let challenge = Challenge::from_hex(challenge_hex).ok_or_else(|| RpcError::Status {
            status: 400,
            message: "invalid challenge".to_string(),
        })?;
        Ok(hex::encode(
            self.signing_key.sign(challenge.as_bytes()).to_bytes(),
        ))
    }

    fn bad_request(message: impl Into<String>) -> QuorumError {
        RpcError::Status {
            status: 400,
            message: message.into(),
        }
        .into()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn inventory(&self, request: InventoryRequest) -> QuorumResult<InventoryReply> {
        let mut reply =
            InventoryReply::from_records(self.sign(&request.challenge)?, &self.vetted, &self.branches)
                .map_err(|e| RpcError::InvalidResponse {
                    reason: e.to_string(),
                })?;
        reply.vetted.extend(self.raw_vetted.iter().cloned());
        Ok(reply)
    }

    async fn plugin_command(&self, command: PluginCommand) -> QuorumResult<PluginCommandReply> {
        self.plugin_calls.fetch_add(1, Ordering::SeqCst);

        if command.id != PLUGIN_ID {
            return Err(Self::bad_request(format!("unknown plugin {}", command.id)));
        }

        let payload = match command.command.as_str() {
            CMD_GET_COMMENTS => {
                let request: GetComments = serde_json::from_str(&command.payload)
                    .map_err(|e| Self::bad_request(e.to_string()))?;
                if self.failing.contains(&request.token) {
                    return Err(RpcError::Status {
                        status: 500,
                        message: "comments unavailable".to_string(),
                    }
                    .into());
                }
                serde_json::to_string(&GetCommentsReply {
                    comments: self.comments.get(&request.token).cloned().unwrap_or_default(),
                })
            }
            CMD_PROPOSAL_COMMENTS_LIKES => {
                let request: GetProposalCommentsLikes = serde_json::from_str(&command.payload)
                    .map_err(|e| Self::bad_request(e.to_string()))?;
                if self.failing.contains(&request.token) {
                    return Err(RpcError::Status {
                        status: 500,
                        message: "likes unavailable".to_string(),
                    }
                    .into());
                }
                serde_json::to_string(&GetProposalCommentsLikesReply {
                    comments_likes: self.likes.get(&request.token).cloned().unwrap_or_default(),
                })
            }
            other => return Err(Self::bad_request(format!("unknown command {}", other))),
        }
        .map_err(|e| Self::bad_request(e.to_string()))?;

        Ok(PluginCommandReply {
            response: self.sign(&command.challenge)?,
            id: command.id,
            command: command.command,
            command_id: command.command_id,
            payload,
        })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Quorum types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_token() -> impl Strategy<Value = Token> {
        "[0-9a-f]{16}".prop_map(Token::from)
    }

    pub fn arb_record_status() -> impl Strategy<Value = RecordStatus> {
        prop_oneof![
            Just(RecordStatus::Invalid),
            Just(RecordStatus::NotFound),
            Just(RecordStatus::NotReviewed),
            Just(RecordStatus::Censored),
            Just(RecordStatus::Public),
            Just(RecordStatus::UnreviewedChanges),
            Just(RecordStatus::Archived),
        ]
    }

    pub fn arb_proposal_state() -> impl Strategy<Value = ProposalState> {
        prop_oneof![
            Just(ProposalState::Invalid),
            Just(ProposalState::Unvetted),
            Just(ProposalState::Vetted),
        ]
    }

    pub fn arb_vote_action() -> impl Strategy<Value = VoteAction> {
        prop_oneof![Just(VoteAction::Up), Just(VoteAction::Down)]
    }

    /// A record with general metadata and an author from a small key pool.
    pub fn arb_record(token: Token) -> impl Strategy<Value = Record> {
        (arb_record_status(), 0i64..1_000_000, 0u8..4).prop_map(move |(status, timestamp, author)| {
            fixtures::record(token.as_str(), status, timestamp, &format!("pk-{}", author))
        })
    }

    /// Records with pairwise distinct tokens.
    pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<Record>> {
        prop::collection::hash_set(arb_token(), 0..max).prop_flat_map(|tokens| {
            tokens
                .into_iter()
                .map(arb_record)
                .collect::<Vec<_>>()
        })
    }

    /// Like events on `token` over a few comments and users.
    pub fn arb_likes(token: Token, max: usize) -> impl Strategy<Value = Vec<LikeEvent>> {
        prop::collection::vec((0u8..3, 0u8..5, arb_vote_action(), 0i64..50), 0..max).prop_map(
            move |raw| {
                raw.into_iter()
                    .map(|(comment, user, action, timestamp)| {
                        fixtures::like(
                            token.as_str(),
                            &format!("c{}", comment),
                            &format!("u{}", user),
                            action,
                            timestamp,
                        )
                    })
                    .collect()
            },
        )
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records, payloads, and keys.

    use super::*;

    /// Deterministic ed25519 key.
    pub fn signing_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    /// General metadata stream payload.
    pub fn general_metadata(name: &str, public_key: &str, timestamp: i64) -> MetadataStream {
        MetadataStream::new(
            quorum_storage::MD_STREAM_GENERAL,
            serde_json::json!({
                "version": 1,
                "timestamp": timestamp,
                "name": name,
                "publickey": public_key,
                "signature": "sig",
            })
            .to_string(),
        )
    }

    /// Status change stream payload, one newline-terminated value per status.
    pub fn changes(statuses: &[RecordStatus]) -> MetadataStream {
        let payload: String = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut line = serde_json::json!({
                    "version": 1,
                    "adminpubkey": "admin",
                    "newstatus": status.code(),
                    "timestamp": i as i64,
                })
                .to_string();
                line.push('\n');
                line
            })
            .collect();
        MetadataStream::new(quorum_storage::MD_STREAM_CHANGES, payload)
    }

    /// A record authored by `public_key`, named after its token.
    pub fn record(token: &str, status: RecordStatus, timestamp: i64, public_key: &str) -> Record {
        Record {
            status,
            timestamp,
            censorship_record: CensorshipRecord {
                token: Token::from(token),
                merkle: "merkle".to_string(),
                signature: "signature".to_string(),
            },
            version: "1".to_string(),
            metadata: vec![general_metadata(token, public_key, timestamp)],
        }
    }

    pub fn comment(token: &str, comment_id: &str) -> Comment {
        Comment {
            token: Token::from(token),
            comment_id: comment_id.to_string(),
            content: format!("Comment {}", comment_id),
            public_key: "commenter".to_string(),
            ..Default::default()
        }
    }

    pub fn like(
        token: &str,
        comment_id: &str,
        public_key: &str,
        action: VoteAction,
        timestamp: i64,
    ) -> LikeEvent {
        LikeEvent {
            token: Token::from(token),
            comment_id: comment_id.to_string(),
            action,
            signature: String::new(),
            public_key: public_key.to_string(),
            receipt: String::new(),
            timestamp,
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for Quorum results and inventory invariants.

    use super::*;

    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    #[track_caller]
    pub fn assert_err<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        assert!(result.is_err(), "Expected Err, got Ok: {:?}", result);
    }

    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        match result {
            Err(QuorumError::Inventory(InventoryError::NotFound { .. })) => {}
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_duplicate_token<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        match result {
            Err(QuorumError::Inventory(InventoryError::DuplicateToken { .. })) => {}
            other => panic!("Expected DuplicateToken, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_challenge_failure<T: std::fmt::Debug>(result: &QuorumResult<T>) {
        match result {
            Err(QuorumError::Rpc(RpcError::ChallengeVerificationFailure { .. })) => {}
            other => panic!("Expected ChallengeVerificationFailure, got: {:?}", other),
        }
    }

    /// Assert that the status counters add up to the entry count.
    #[track_caller]
    pub fn assert_stats_consistent(inventory: &Inventory) {
        let state = inventory.read().expect("inventory lock poisoned");
        let stats = state.inventory_stats();
        assert_eq!(
            stats.total(),
            state.len(),
            "Status counters {:?} do not sum to {} entries",
            stats,
            state.len()
        );
    }
}
