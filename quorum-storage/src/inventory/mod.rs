//! In-memory proposal inventory.
//!
//! One `RwLock` guards every entry together with the status and per-user
//! counters, so the counters always agree with the entries. Multi-step
//! sequences take the guard once via [`Inventory::write`] and call the
//! methods of [`InventoryState`] directly; everything else goes through the
//! acquiring wrappers on [`Inventory`].
//!
//! Entries are never removed. Callers always receive copies.

pub mod metadata;
pub mod query;
pub mod stats;
pub mod tally;

pub use metadata::{
    load_record_metadata, LoadReport, SkipReason, SkippedStream, MD_STREAM_AUTHORIZE_VOTE,
    MD_STREAM_CHANGES, MD_STREAM_GENERAL, MD_STREAM_VOTE_BITS, MD_STREAM_VOTE_SNAPSHOT,
};
pub use query::{select_page, ProposalsRequest};
pub use stats::ProposalStats;
pub use tally::{tally_comment_likes, LikesTally, VoteCount};

use quorum_core::{
    Comment, CommentId, InventoryConfig, InventoryError, LikeEvent, ProposalMetadata,
    ProposalRecord, ProposalStatus, QuorumResult, Record, StartVote, StartVoteReply,
    StatusChange, Token, UserId, VoteAction, VoteAuthorization,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::{EmptyUserDirectory, UserDirectory};

// ============================================================================
// ENTRY
// ============================================================================

/// Everything the inventory knows about one proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Latest record snapshot from the record store.
    pub record: Record,
    pub proposal_metadata: ProposalMetadata,
    pub comments: HashMap<CommentId, Comment>,
    /// Raw like events per comment, in ingestion order.
    pub comment_likes: HashMap<CommentId, Vec<LikeEvent>>,
    /// Status change history, oldest first.
    pub changes: Vec<StatusChange>,
    pub vote_authorization: Option<VoteAuthorization>,
    pub vote_config: Option<StartVote>,
    pub vote_outcome: Option<StartVoteReply>,
}

impl InventoryEntry {
    /// A fresh entry with nothing decoded yet.
    pub fn new(record: Record) -> Self {
        Self {
            record,
            proposal_metadata: ProposalMetadata::default(),
            comments: HashMap::new(),
            comment_likes: HashMap::new(),
            changes: Vec::new(),
            vote_authorization: None,
            vote_config: None,
            vote_outcome: None,
        }
    }

    pub fn token(&self) -> &Token {
        self.record.token()
    }

    pub fn status(&self) -> ProposalStatus {
        self.record.proposal_status()
    }

    /// Tally the raw like events of this entry.
    pub fn tally(&self) -> LikesTally {
        tally_comment_likes(self.comment_likes.values().flatten())
    }

    /// Recompute every comment's vote totals from the raw like events.
    fn apply_tally(&mut self) {
        let tally = self.tally();

        for comment_id in tally.comment_ids() {
            if !self.comments.contains_key(comment_id) {
                tracing::debug!(
                    token = %self.record.token(),
                    comment_id = %comment_id,
                    "Likes reference an unknown comment"
                );
            }
        }

        for (comment_id, comment) in self.comments.iter_mut() {
            let votes = tally.votes(comment_id);
            comment.up_votes = votes.up;
            comment.down_votes = votes.down;
        }
    }

    /// Denormalized view, without owner resolution.
    fn to_proposal(&self) -> ProposalRecord {
        let status = self.status();
        ProposalRecord {
            name: self.proposal_metadata.name.clone(),
            state: status.state(),
            status,
            timestamp: self.record.timestamp,
            user_id: None,
            username: None,
            public_key: self.proposal_metadata.public_key.clone(),
            signature: self.proposal_metadata.signature.clone(),
            version: self.record.version.clone(),
            censorship_record: self.record.censorship_record.clone(),
            num_comments: self.comments.len(),
            changes: self.changes.clone(),
            vote_authorization: self.vote_authorization.clone(),
            vote_config: self.vote_config.clone(),
            vote_outcome: self.vote_outcome.clone(),
        }
    }
}

// ============================================================================
// GUARDED STATE
// ============================================================================

/// Inventory contents. Only reachable through an [`Inventory`] guard.
pub struct InventoryState {
    entries: HashMap<Token, InventoryEntry>,
    stats: ProposalStats,
    proposals_by_user: HashMap<UserId, usize>,
    directory: Arc<dyn UserDirectory>,
}

impl InventoryState {
    fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: ProposalStats::default(),
            proposals_by_user: HashMap::new(),
            directory,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.entries.keys().cloned().collect()
    }

    fn entry(&self, token: &str) -> QuorumResult<&InventoryEntry> {
        self.entries.get(token).ok_or_else(|| {
            InventoryError::NotFound {
                token: Token::from(token),
            }
            .into()
        })
    }

    fn entry_mut(&mut self, token: &str) -> QuorumResult<&mut InventoryEntry> {
        self.entries.get_mut(token).ok_or_else(|| {
            InventoryError::NotFound {
                token: Token::from(token),
            }
            .into()
        })
    }

    /// Add a record seen for the first time.
    pub fn insert(&mut self, record: Record) -> QuorumResult<LoadReport> {
        let token = record.token().clone();
        if self.entries.contains_key(&token) {
            return Err(InventoryError::DuplicateToken { token }.into());
        }

        let mut entry = InventoryEntry::new(record);
        let streams = std::mem::take(&mut entry.record.metadata);
        let report = load_record_metadata(&mut entry, &streams);
        entry.record.metadata = streams;

        self.stats.increment(entry.status());

        let public_key = &entry.proposal_metadata.public_key;
        match self.directory.user_id_by_public_key(public_key) {
            Some(user_id) => *self.proposals_by_user.entry(user_id).or_insert(0) += 1,
            None => tracing::warn!(
                token = %token,
                public_key = %public_key,
                "User not found for proposal author"
            ),
        }

        self.entries.insert(token, entry);
        Ok(report)
    }

    /// Replace the record snapshot of a known token and reload its metadata.
    ///
    /// The change history is replaced by the new payload, which carries the
    /// full history. A missing or undecodable change stream keeps the old one.
    pub fn update(&mut self, record: Record) -> QuorumResult<LoadReport> {
        let entry = self.entry_mut(record.token().as_str())?;
        let old_status = entry.status();
        let old_author = entry.proposal_metadata.public_key.clone();

        entry.record = record;
        let streams = std::mem::take(&mut entry.record.metadata);
        let report = load_record_metadata(entry, &streams);
        entry.record.metadata = streams;
        let new_status = entry.status();
        let new_author = entry.proposal_metadata.public_key.clone();

        self.stats.transition(old_status, new_status);
        if old_author != new_author {
            self.move_author_count(&old_author, &new_author);
        }
        Ok(report)
    }

    fn move_author_count(&mut self, old_author: &str, new_author: &str) {
        if let Some(user_id) = self.directory.user_id_by_public_key(old_author) {
            if let Some(count) = self.proposals_by_user.get_mut(&user_id) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.proposals_by_user.remove(&user_id);
                }
            }
        }
        if let Some(user_id) = self.directory.user_id_by_public_key(new_author) {
            *self.proposals_by_user.entry(user_id).or_insert(0) += 1;
        }
    }

    /// Drop everything and load `records` as the new population.
    ///
    /// Nothing changes unless every record inserts.
    pub fn reinitialize(&mut self, records: Vec<Record>) -> QuorumResult<Vec<LoadReport>> {
        let mut fresh = InventoryState::new(Arc::clone(&self.directory));
        let reports = records
            .into_iter()
            .map(|record| fresh.insert(record))
            .collect::<QuorumResult<Vec<_>>>()?;
        *self = fresh;
        Ok(reports)
    }

    pub fn get(&self, token: &str) -> QuorumResult<InventoryEntry> {
        self.entry(token).cloned()
    }

    /// Every proposal, with comment counts and resolved owners.
    pub fn get_all(&self) -> Vec<ProposalRecord> {
        self.entries.values().map(|e| self.resolve(e)).collect()
    }

    pub fn get_proposal(&self, token: &str) -> QuorumResult<ProposalRecord> {
        Ok(self.resolve(self.entry(token)?))
    }

    fn resolve(&self, entry: &InventoryEntry) -> ProposalRecord {
        let mut proposal = entry.to_proposal();
        match self.directory.user_id_by_public_key(&proposal.public_key) {
            Some(user_id) => {
                proposal.username = self.directory.username(&user_id);
                proposal.user_id = Some(user_id);
            }
            None => tracing::warn!(
                token = %entry.token(),
                public_key = %proposal.public_key,
                "User not found for public key"
            ),
        }
        proposal
    }

    pub fn get_comment(&self, token: &str, comment_id: &str) -> QuorumResult<Comment> {
        self.entry(token)?
            .comments
            .get(comment_id)
            .cloned()
            .ok_or_else(|| {
                InventoryError::CommentNotFound {
                    token: Token::from(token),
                    comment_id: comment_id.to_string(),
                }
                .into()
            })
    }

    /// Insert or replace one comment.
    pub fn set_comment(&mut self, comment: Comment) -> QuorumResult<()> {
        let entry = self.entry_mut(comment.token.as_str())?;
        let votes = entry.tally().votes(&comment.comment_id);
        let mut comment = comment;
        comment.up_votes = votes.up;
        comment.down_votes = votes.down;
        entry.comments.insert(comment.comment_id.clone(), comment);
        Ok(())
    }

    /// Replace every comment of a proposal.
    pub fn replace_comments(&mut self, token: &str, comments: Vec<Comment>) -> QuorumResult<()> {
        let entry = self.entry_mut(token)?;
        entry.comments = comments
            .into_iter()
            .map(|c| (c.comment_id.clone(), c))
            .collect();
        entry.apply_tally();
        Ok(())
    }

    /// Record one like event and recompute the tallies.
    pub fn add_comment_like(&mut self, like: LikeEvent) -> QuorumResult<()> {
        let entry = self.entry_mut(like.token.as_str())?;
        entry
            .comment_likes
            .entry(like.comment_id.clone())
            .or_default()
            .push(like);
        entry.apply_tally();
        Ok(())
    }

    /// Replace every like event of a proposal and recompute the tallies.
    pub fn replace_comment_likes(&mut self, token: &str, likes: Vec<LikeEvent>) -> QuorumResult<()> {
        let entry = self.entry_mut(token)?;
        let mut grouped: HashMap<CommentId, Vec<LikeEvent>> = HashMap::new();
        for like in likes {
            grouped.entry(like.comment_id.clone()).or_default().push(like);
        }
        entry.comment_likes = grouped;
        entry.apply_tally();
        Ok(())
    }

    pub fn user_comment_action(
        &self,
        token: &str,
        comment_id: &str,
        public_key: &str,
    ) -> QuorumResult<Option<VoteAction>> {
        let entry = self.entry(token)?;
        let events = entry.comment_likes.get(comment_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(tally_comment_likes(events).action(comment_id, public_key))
    }

    pub fn set_vote_authorization(
        &mut self,
        token: &str,
        authorization: VoteAuthorization,
    ) -> QuorumResult<()> {
        self.entry_mut(token)?.vote_authorization = Some(authorization);
        Ok(())
    }

    pub fn set_vote_config_and_outcome(
        &mut self,
        token: &str,
        config: StartVote,
        outcome: StartVoteReply,
    ) -> QuorumResult<()> {
        let entry = self.entry_mut(token)?;
        entry.vote_config = Some(config);
        entry.vote_outcome = Some(outcome);
        Ok(())
    }

    pub fn inventory_stats(&self) -> ProposalStats {
        self.stats
    }

    /// Status counters of one user's proposals, by full scan.
    pub fn user_stats(&self, user_id: &str) -> ProposalStats {
        ProposalStats::from_statuses(
            self.entries
                .values()
                .filter(|e| {
                    self.directory
                        .user_id_by_public_key(&e.proposal_metadata.public_key)
                        .is_some_and(|id| id == user_id)
                })
                .map(InventoryEntry::status),
        )
    }

    pub fn proposal_count_by_user(&self, user_id: &str) -> usize {
        self.proposals_by_user.get(user_id).copied().unwrap_or(0)
    }
}

// ============================================================================
// INVENTORY
// ============================================================================

/// Thread-safe proposal inventory.
pub struct Inventory {
    state: RwLock<InventoryState>,
    config: InventoryConfig,
}

impl Inventory {
    pub fn new(config: InventoryConfig, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            state: RwLock::new(InventoryState::new(directory)),
            config,
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    /// Take shared access for a multi-step read.
    pub fn read(&self) -> QuorumResult<RwLockReadGuard<'_, InventoryState>> {
        self.state
            .read()
            .map_err(|_| InventoryError::LockPoisoned.into())
    }

    /// Take exclusive access for a multi-step mutation.
    pub fn write(&self) -> QuorumResult<RwLockWriteGuard<'_, InventoryState>> {
        self.state
            .write()
            .map_err(|_| InventoryError::LockPoisoned.into())
    }

    pub fn len(&self) -> QuorumResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> QuorumResult<bool> {
        Ok(self.read()?.is_empty())
    }

    pub fn insert(&self, record: Record) -> QuorumResult<LoadReport> {
        self.write()?.insert(record)
    }

    pub fn update(&self, record: Record) -> QuorumResult<LoadReport> {
        self.write()?.update(record)
    }

    pub fn get(&self, token: &str) -> QuorumResult<InventoryEntry> {
        self.read()?.get(token)
    }

    pub fn get_all(&self) -> QuorumResult<Vec<ProposalRecord>> {
        Ok(self.read()?.get_all())
    }

    pub fn get_proposal(&self, token: &str) -> QuorumResult<ProposalRecord> {
        self.read()?.get_proposal(token)
    }

    pub fn get_comment(&self, token: &str, comment_id: &str) -> QuorumResult<Comment> {
        self.read()?.get_comment(token, comment_id)
    }

    pub fn set_comment(&self, comment: Comment) -> QuorumResult<()> {
        self.write()?.set_comment(comment)
    }

    pub fn replace_comments(&self, token: &str, comments: Vec<Comment>) -> QuorumResult<()> {
        self.write()?.replace_comments(token, comments)
    }

    pub fn add_comment_like(&self, like: LikeEvent) -> QuorumResult<()> {
        self.write()?.add_comment_like(like)
    }

    pub fn replace_comment_likes(&self, token: &str, likes: Vec<LikeEvent>) -> QuorumResult<()> {
        self.write()?.replace_comment_likes(token, likes)
    }

    pub fn user_comment_action(
        &self,
        token: &str,
        comment_id: &str,
        public_key: &str,
    ) -> QuorumResult<Option<VoteAction>> {
        self.read()?.user_comment_action(token, comment_id, public_key)
    }

    pub fn set_vote_authorization(
        &self,
        token: &str,
        authorization: VoteAuthorization,
    ) -> QuorumResult<()> {
        self.write()?.set_vote_authorization(token, authorization)
    }

    pub fn set_vote_config_and_outcome(
        &self,
        token: &str,
        config: StartVote,
        outcome: StartVoteReply,
    ) -> QuorumResult<()> {
        self.write()?.set_vote_config_and_outcome(token, config, outcome)
    }

    pub fn inventory_stats(&self) -> QuorumResult<ProposalStats> {
        Ok(self.read()?.inventory_stats())
    }

    pub fn user_stats(&self, user_id: &str) -> QuorumResult<ProposalStats> {
        Ok(self.read()?.user_stats(user_id))
    }

    pub fn proposal_count_by_user(&self, user_id: &str) -> QuorumResult<usize> {
        Ok(self.read()?.proposal_count_by_user(user_id))
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(InventoryConfig::default(), Arc::new(EmptyUserDirectory))
    }
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory")
            .field("entries", &self.len().unwrap_or(0))
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryUserDirectory;
    use quorum_core::{CensorshipRecord, MetadataStream, QuorumError, RecordStatus};

    fn record(token: &str, status: RecordStatus, author: &str) -> Record {
        Record {
            status,
            timestamp: 100,
            censorship_record: CensorshipRecord {
                token: Token::from(token),
                merkle: "m".to_string(),
                signature: "s".to_string(),
            },
            version: "1".to_string(),
            metadata: vec![MetadataStream::new(
                MD_STREAM_GENERAL,
                format!(
                    r#"{{"version":1,"timestamp":100,"name":"{}","publickey":"{}","signature":"sig"}}"#,
                    token, author
                ),
            )],
        }
    }

    fn comment(token: &str, id: &str) -> Comment {
        Comment {
            token: Token::from(token),
            comment_id: id.to_string(),
            content: format!("comment {}", id),
            ..Default::default()
        }
    }

    fn like(token: &str, comment_id: &str, user: &str, action: VoteAction, ts: i64) -> LikeEvent {
        LikeEvent {
            token: Token::from(token),
            comment_id: comment_id.to_string(),
            action,
            signature: String::new(),
            public_key: user.to_string(),
            receipt: String::new(),
            timestamp: ts,
        }
    }

    fn inventory_with_users() -> Inventory {
        let directory = InMemoryUserDirectory::new();
        directory.register("u1", "alice", "pk-a");
        directory.register("u2", "bob", "pk-b");
        Inventory::new(InventoryConfig::default(), Arc::new(directory))
    }

    #[test]
    fn test_insert_then_get() {
        let inventory = inventory_with_users();
        let r = record("t1", RecordStatus::NotReviewed, "pk-a");
        let report = inventory.insert(r.clone()).unwrap();
        assert!(report.is_clean());

        let entry = inventory.get("t1").unwrap();
        assert_eq!(entry.record, r);
        assert!(entry.comments.is_empty());
        assert!(entry.comment_likes.is_empty());
        assert_eq!(entry.proposal_metadata.name, "t1");
    }

    #[test]
    fn test_duplicate_insert_leaves_state_unchanged() {
        let inventory = inventory_with_users();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk-a"))
            .unwrap();
        let stats_before = inventory.inventory_stats().unwrap();

        let err = inventory
            .insert(record("t1", RecordStatus::Censored, "pk-b"))
            .unwrap_err();
        assert!(matches!(
            err,
            QuorumError::Inventory(InventoryError::DuplicateToken { .. })
        ));
        assert_eq!(inventory.inventory_stats().unwrap(), stats_before);
        assert_eq!(inventory.get("t1").unwrap().record.status, RecordStatus::Public);
        assert_eq!(inventory.proposal_count_by_user("u2").unwrap(), 0);
    }

    #[test]
    fn test_missing_token_is_not_found() {
        let inventory = Inventory::default();
        assert!(matches!(
            inventory.get("nope"),
            Err(QuorumError::Inventory(InventoryError::NotFound { .. }))
        ));
        assert!(inventory.update(record("nope", RecordStatus::Public, "x")).is_err());
        assert!(inventory.set_comment(comment("nope", "1")).is_err());
        assert!(inventory
            .set_vote_authorization("nope", VoteAuthorization::default())
            .is_err());
        assert!(inventory.is_empty().unwrap());
    }

    #[test]
    fn test_update_moves_status_bucket() {
        let inventory = inventory_with_users();
        inventory
            .insert(record("t1", RecordStatus::NotReviewed, "pk-a"))
            .unwrap();
        inventory
            .insert(record("t2", RecordStatus::Censored, "pk-b"))
            .unwrap();
        let before = inventory.inventory_stats().unwrap();

        inventory
            .update(record("t1", RecordStatus::Public, "pk-a"))
            .unwrap();
        let after = inventory.inventory_stats().unwrap();

        assert_eq!(after.unvetted, before.unvetted - 1);
        assert_eq!(after.public, before.public + 1);
        assert_eq!(after.censored, before.censored);
        assert_eq!(after.total(), inventory.len().unwrap());
    }

    fn with_changes(mut r: Record, payload: &str) -> Record {
        r.metadata.push(MetadataStream::new(MD_STREAM_CHANGES, payload));
        r
    }

    #[test]
    fn test_update_rebuilds_change_history() {
        let inventory = Inventory::default();
        let r = with_changes(
            record("t1", RecordStatus::Public, "pk"),
            r#"{"version":1,"newstatus":4,"timestamp":1}"#,
        );
        inventory.insert(r.clone()).unwrap();
        inventory.update(r).unwrap();
        assert_eq!(inventory.get("t1").unwrap().changes.len(), 1);

        let grown = with_changes(
            record("t1", RecordStatus::Archived, "pk"),
            concat!(
                r#"{"version":1,"newstatus":4,"timestamp":1}"#,
                r#"{"version":1,"newstatus":6,"timestamp":2}"#
            ),
        );
        inventory.update(grown).unwrap();
        let changes = inventory.get("t1").unwrap().changes;
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].new_status, RecordStatus::Archived);
    }

    #[test]
    fn test_update_with_broken_changes_keeps_history() {
        let inventory = Inventory::default();
        inventory
            .insert(with_changes(
                record("t1", RecordStatus::Public, "pk"),
                r#"{"version":1,"newstatus":4,"timestamp":1}"#,
            ))
            .unwrap();

        let report = inventory
            .update(with_changes(record("t1", RecordStatus::Public, "pk"), "{broken"))
            .unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(inventory.get("t1").unwrap().changes.len(), 1);

        inventory
            .update(record("t1", RecordStatus::Public, "pk"))
            .unwrap();
        assert_eq!(inventory.get("t1").unwrap().changes.len(), 1);
    }

    #[test]
    fn test_update_moves_author_count() {
        let inventory = inventory_with_users();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk-a"))
            .unwrap();
        inventory
            .update(record("t1", RecordStatus::Public, "pk-b"))
            .unwrap();

        assert_eq!(inventory.proposal_count_by_user("u1").unwrap(), 0);
        assert_eq!(inventory.proposal_count_by_user("u2").unwrap(), 1);
        assert_eq!(inventory.user_stats("u2").unwrap().public, 1);
    }

    #[test]
    fn test_get_all_resolves_owner() {
        let inventory = inventory_with_users();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk-a"))
            .unwrap();
        inventory
            .insert(record("t2", RecordStatus::Public, "pk-unknown"))
            .unwrap();
        inventory.set_comment(comment("t1", "1")).unwrap();

        let t1 = inventory.get_proposal("t1").unwrap();
        assert_eq!(t1.user_id.as_deref(), Some("u1"));
        assert_eq!(t1.username.as_deref(), Some("alice"));
        assert_eq!(t1.num_comments, 1);

        let t2 = inventory.get_proposal("t2").unwrap();
        assert!(t2.user_id.is_none());
        assert!(t2.username.is_none());

        assert_eq!(inventory.get_all().unwrap().len(), 2);
    }

    #[test]
    fn test_proposal_counts_by_user() {
        let inventory = inventory_with_users();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk-a"))
            .unwrap();
        inventory
            .insert(record("t2", RecordStatus::NotReviewed, "pk-a"))
            .unwrap();
        inventory
            .insert(record("t3", RecordStatus::Public, "pk-nobody"))
            .unwrap();

        assert_eq!(inventory.proposal_count_by_user("u1").unwrap(), 2);
        assert_eq!(inventory.proposal_count_by_user("u2").unwrap(), 0);

        let stats = inventory.user_stats("u1").unwrap();
        assert_eq!(stats.public, 1);
        assert_eq!(stats.unvetted, 1);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_comment_not_found() {
        let inventory = Inventory::default();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk"))
            .unwrap();
        assert!(matches!(
            inventory.get_comment("t1", "9"),
            Err(QuorumError::Inventory(InventoryError::CommentNotFound { .. }))
        ));
    }

    #[test]
    fn test_likes_drive_comment_totals() {
        let inventory = Inventory::default();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk"))
            .unwrap();
        inventory
            .replace_comments("t1", vec![comment("t1", "c1"), comment("t1", "c2")])
            .unwrap();

        inventory
            .add_comment_like(like("t1", "c1", "u1", VoteAction::Up, 1))
            .unwrap();
        inventory
            .add_comment_like(like("t1", "c1", "u1", VoteAction::Down, 2))
            .unwrap();
        inventory
            .add_comment_like(like("t1", "c1", "u2", VoteAction::Up, 3))
            .unwrap();

        let c1 = inventory.get_comment("t1", "c1").unwrap();
        assert_eq!((c1.up_votes, c1.down_votes), (1, 1));
        let c2 = inventory.get_comment("t1", "c2").unwrap();
        assert_eq!((c2.up_votes, c2.down_votes), (0, 0));

        assert_eq!(
            inventory.user_comment_action("t1", "c1", "u1").unwrap(),
            Some(VoteAction::Down)
        );
        assert_eq!(inventory.user_comment_action("t1", "c2", "u1").unwrap(), None);
    }

    #[test]
    fn test_set_comment_takes_tally_not_payload_totals() {
        let inventory = Inventory::default();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk"))
            .unwrap();
        inventory
            .replace_comment_likes("t1", vec![like("t1", "c1", "u1", VoteAction::Up, 1)])
            .unwrap();

        let mut c = comment("t1", "c1");
        c.up_votes = 40;
        inventory.set_comment(c).unwrap();

        let stored = inventory.get_comment("t1", "c1").unwrap();
        assert_eq!((stored.up_votes, stored.down_votes), (1, 0));
    }

    #[test]
    fn test_vote_setters_replace_wholesale() {
        let inventory = Inventory::default();
        inventory
            .insert(record("t1", RecordStatus::Public, "pk"))
            .unwrap();

        inventory
            .set_vote_config_and_outcome(
                "t1",
                StartVote {
                    version: 1,
                    ..Default::default()
                },
                StartVoteReply {
                    end_height: "500".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        inventory
            .set_vote_authorization(
                "t1",
                VoteAuthorization {
                    action: "authorize".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        let proposal = inventory.get_proposal("t1").unwrap();
        assert_eq!(proposal.vote_config.map(|c| c.version), Some(1));
        assert_eq!(proposal.vote_outcome.map(|o| o.end_height), Some("500".to_string()));
        assert_eq!(
            proposal.vote_authorization.map(|a| a.action),
            Some("authorize".to_string())
        );
    }

    #[test]
    fn test_reinitialize_is_all_or_nothing() {
        let inventory = Inventory::default();
        inventory
            .insert(record("old", RecordStatus::Public, "pk"))
            .unwrap();

        let duplicate = vec![
            record("a", RecordStatus::Public, "pk"),
            record("a", RecordStatus::Public, "pk"),
        ];
        assert!(inventory.write().unwrap().reinitialize(duplicate).is_err());
        assert!(inventory.get("old").is_ok());

        let fresh = vec![
            record("a", RecordStatus::Public, "pk"),
            record("b", RecordStatus::Censored, "pk"),
        ];
        let reports = inventory.write().unwrap().reinitialize(fresh).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(inventory.get("old").is_err());
        assert_eq!(inventory.inventory_stats().unwrap().total(), 2);
    }

    #[test]
    fn test_guard_composes_multi_step_sequence() {
        let inventory = Inventory::default();
        {
            let mut state = inventory.write().unwrap();
            state.insert(record("t1", RecordStatus::Public, "pk")).unwrap();
            state.set_comment(comment("t1", "1")).unwrap();
            assert_eq!(state.get_proposal("t1").unwrap().num_comments, 1);
        }
        assert_eq!(inventory.len().unwrap(), 1);
    }
}
