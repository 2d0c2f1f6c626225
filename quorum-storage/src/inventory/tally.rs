//! Comment vote tallying.
//!
//! Only a user's latest event on a comment counts. Latest means greatest
//! timestamp, and on equal timestamps the event ingested last. The result is
//! therefore independent of the order events arrive in, as long as each
//! (comment, user) pair never sees two events with the same timestamp.

use quorum_core::{CommentId, LikeEvent, PublicKey, UnixTimestamp, VoteAction};
use std::collections::HashMap;

/// Up and down vote totals of one comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCount {
    pub up: u64,
    pub down: u64,
}

impl VoteCount {
    pub fn total(&self) -> u64 {
        self.up + self.down
    }

    pub fn result(&self) -> i64 {
        self.up as i64 - self.down as i64
    }
}

/// Resultant action of every user on every comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikesTally {
    resultant: HashMap<CommentId, HashMap<PublicKey, VoteAction>>,
}

impl LikesTally {
    /// Totals for one comment. A comment nobody voted on counts `0/0`.
    pub fn votes(&self, comment_id: &str) -> VoteCount {
        let mut count = VoteCount::default();
        if let Some(users) = self.resultant.get(comment_id) {
            for action in users.values() {
                match action {
                    VoteAction::Up => count.up += 1,
                    VoteAction::Down => count.down += 1,
                }
            }
        }
        count
    }

    /// A user's resultant action on a comment.
    pub fn action(&self, comment_id: &str, public_key: &str) -> Option<VoteAction> {
        self.resultant.get(comment_id)?.get(public_key).copied()
    }

    /// Comments with at least one event.
    pub fn comment_ids(&self) -> impl Iterator<Item = &CommentId> {
        self.resultant.keys()
    }

    /// Totals of every comment with at least one event.
    pub fn counts(&self) -> HashMap<CommentId, VoteCount> {
        self.resultant
            .keys()
            .map(|id| (id.clone(), self.votes(id)))
            .collect()
    }
}

/// Reduce raw like events to per-comment totals.
///
/// `events` must be in ingestion order for the tie-break to hold.
pub fn tally_comment_likes<'a, I>(events: I) -> LikesTally
where
    I: IntoIterator<Item = &'a LikeEvent>,
{
    let mut latest: HashMap<(&'a str, &'a str), (UnixTimestamp, VoteAction)> = HashMap::new();

    for event in events {
        let key = (event.comment_id.as_str(), event.public_key.as_str());
        match latest.get(&key) {
            Some((timestamp, _)) if *timestamp > event.timestamp => {}
            _ => {
                latest.insert(key, (event.timestamp, event.action));
            }
        }
    }

    let mut resultant: HashMap<CommentId, HashMap<PublicKey, VoteAction>> = HashMap::new();
    for ((comment_id, public_key), (_, action)) in latest {
        resultant
            .entry(comment_id.to_string())
            .or_default()
            .insert(public_key.to_string(), action);
    }

    LikesTally { resultant }
}
