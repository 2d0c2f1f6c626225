//! Loading the inventory from the record store.
//!
//! Record store calls never run while the inventory guard is held. Results
//! are written back under a fresh exclusive acquisition, so an entry updated
//! between the call and the write-back is overwritten with what the call
//! returned.

use quorum_core::{QuorumError, QuorumResult, Record, Token};
use quorum_rpc::{CallContext, RecordStore, RecordStoreClient};
use std::sync::Arc;

use crate::inventory::{Inventory, LoadReport};

/// Summary of one bulk initialization.
#[derive(Debug, Clone, Default)]
pub struct InitReport {
    /// Records inserted.
    pub records: usize,
    /// Records in the reply that did not decode.
    pub rejected_records: usize,
    /// Metadata streams skipped across every record.
    pub skipped_streams: usize,
    /// Records whose comments or likes could not be loaded.
    pub comment_failures: Vec<(Token, QuorumError)>,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.rejected_records == 0 && self.skipped_streams == 0 && self.comment_failures.is_empty()
    }
}

/// Drives the inventory from a record store.
pub struct InventorySync<S: RecordStore> {
    inventory: Arc<Inventory>,
    client: RecordStoreClient<S>,
}

impl<S: RecordStore> InventorySync<S> {
    pub fn new(inventory: Arc<Inventory>, client: RecordStoreClient<S>) -> Self {
        Self { inventory, client }
    }

    pub fn inventory(&self) -> &Arc<Inventory> {
        &self.inventory
    }

    pub fn client(&self) -> &RecordStoreClient<S> {
        &self.client
    }

    /// Rebuild the inventory from a full record store fetch.
    ///
    /// A failed fetch or a duplicate token leaves the inventory untouched.
    /// Undecodable records and comment loading failures are per record and
    /// do not stop the rest.
    pub async fn initialize(&self, ctx: &CallContext) -> QuorumResult<InitReport> {
        let fetched = self.client.fetch_inventory(ctx).await?;
        let records = fetched.records;
        let tokens: Vec<Token> = records.iter().map(|r| r.token().clone()).collect();

        let reports = self.inventory.write()?.reinitialize(records)?;
        let mut report = InitReport {
            records: reports.len(),
            rejected_records: fetched.rejected,
            skipped_streams: reports.iter().map(|r| r.skipped.len()).sum(),
            comment_failures: Vec::new(),
        };

        for token in tokens {
            if let Err(e) = self.load_record_comments(ctx, &token).await {
                tracing::error!(token = %token, error = %e, "Could not load comments");
                report.comment_failures.push((token, e));
            }
        }

        tracing::info!(
            records = report.records,
            rejected_records = report.rejected_records,
            skipped_streams = report.skipped_streams,
            comment_failures = report.comment_failures.len(),
            "Inventory initialized"
        );
        Ok(report)
    }

    /// Fetch a proposal's comments and likes and write them back.
    pub async fn load_record_comments(&self, ctx: &CallContext, token: &Token) -> QuorumResult<()> {
        let comments = self.client.get_comments(ctx, token).await?;
        let likes = self.client.get_comments_likes(ctx, token).await?;

        let mut state = self.inventory.write()?;
        state.replace_comments(token.as_str(), comments)?;
        state.replace_comment_likes(token.as_str(), likes)?;
        Ok(())
    }

    /// Bring one record up to date: insert it if unseen, otherwise update
    /// it, then reload its comments.
    pub async fn sync_record(&self, ctx: &CallContext, record: Record) -> QuorumResult<LoadReport> {
        let token = record.token().clone();
        let report = {
            let mut state = self.inventory.write()?;
            if state.contains(token.as_str()) {
                state.update(record)?
            } else {
                state.insert(record)?
            }
        };

        self.load_record_comments(ctx, &token).await?;
        Ok(report)
    }
}
