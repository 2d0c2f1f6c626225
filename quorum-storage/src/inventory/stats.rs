//! Proposal counters by status bucket.

use quorum_core::{ProposalStatus, StatusBucket};

/// Number of proposals in each status bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProposalStats {
    pub invalid: usize,
    pub censored: usize,
    pub unvetted: usize,
    pub unvetted_changes: usize,
    pub public: usize,
    pub abandoned: usize,
}

impl ProposalStats {
    /// Count a batch of statuses from scratch.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = ProposalStatus>,
    {
        let mut stats = Self::default();
        for status in statuses {
            stats.increment(status);
        }
        stats
    }

    pub fn get(&self, bucket: StatusBucket) -> usize {
        match bucket {
            StatusBucket::Invalid => self.invalid,
            StatusBucket::Censored => self.censored,
            StatusBucket::Unvetted => self.unvetted,
            StatusBucket::UnvettedChanges => self.unvetted_changes,
            StatusBucket::Public => self.public,
            StatusBucket::Abandoned => self.abandoned,
        }
    }

    fn slot(&mut self, bucket: StatusBucket) -> &mut usize {
        match bucket {
            StatusBucket::Invalid => &mut self.invalid,
            StatusBucket::Censored => &mut self.censored,
            StatusBucket::Unvetted => &mut self.unvetted,
            StatusBucket::UnvettedChanges => &mut self.unvetted_changes,
            StatusBucket::Public => &mut self.public,
            StatusBucket::Abandoned => &mut self.abandoned,
        }
    }

    /// Count a newly inserted proposal.
    pub fn increment(&mut self, status: ProposalStatus) {
        *self.slot(status.bucket()) += 1;
    }

    /// Move one proposal from the bucket of `old` to the bucket of `new`.
    pub fn transition(&mut self, old: ProposalStatus, new: ProposalStatus) {
        let old_slot = self.slot(old.bucket());
        *old_slot = old_slot.saturating_sub(1);
        *self.slot(new.bucket()) += 1;
    }

    /// Sum over every bucket.
    pub fn total(&self) -> usize {
        StatusBucket::ALL.iter().map(|b| self.get(*b)).sum()
    }
}
