//! Verified record store client.
//!
//! Wraps a [`RecordStore`] transport with the challenge-response handshake,
//! typed plugin payloads, and caller supplied deadlines. There is no retry
//! loop here; a timed out call fails and the error goes to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use quorum_core::{Comment, LikeEvent, QuorumResult, RpcError, Token};

use crate::challenge::{Challenge, ServerIdentity};
use crate::decred::{
    self, GetComments, GetProposalCommentsLikes, PluginRequest, PLUGIN_ID,
};
use crate::store::RecordStore;
use crate::wire::{InventoryRecords, InventoryRequest, PluginCommand};

/// Per-request call options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
}

impl CallContext {
    /// A context without a deadline.
    pub fn unbounded() -> Self {
        Self { timeout: None }
    }

    /// A context that fails calls taking longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Run `fut` under the context deadline.
pub async fn with_deadline<F, T>(ctx: &CallContext, operation: &str, fut: F) -> QuorumResult<T>
where
    F: Future<Output = QuorumResult<T>>,
{
    match ctx.timeout {
        Some(timeout) => match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::DeadlineExceeded {
                operation: operation.to_string(),
                timeout,
            }
            .into()),
        },
        None => fut.await,
    }
}

/// Record store client that only hands out verified payloads.
pub struct RecordStoreClient<S: RecordStore> {
    store: Arc<S>,
    identity: ServerIdentity,
}

impl<S: RecordStore> RecordStoreClient<S> {
    pub fn new(store: Arc<S>, identity: ServerIdentity) -> Self {
        Self { store, identity }
    }

    /// Get a reference to the underlying transport.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Fetch the full inventory: vetted records followed by branch records.
    ///
    /// Individually malformed records are dropped and counted in the result.
    pub async fn fetch_inventory(&self, ctx: &CallContext) -> QuorumResult<InventoryRecords> {
        let challenge = Challenge::random();
        let request = InventoryRequest {
            challenge: challenge.to_hex(),
            include_files: false,
            vetted_count: 0,
            branches_count: 0,
        };

        let reply = with_deadline(ctx, "inventory", self.store.inventory(request)).await?;
        self.identity.verify(&challenge, &reply.response)?;

        let vetted = reply.vetted.len();
        let branches = reply.branches.len();
        let decoded = reply.decode_records();
        tracing::debug!(
            vetted,
            branches,
            rejected = decoded.rejected,
            "Fetched record store inventory"
        );
        Ok(decoded)
    }

    /// Execute one plugin command and decode its verified reply.
    pub async fn execute<R: PluginRequest>(
        &self,
        ctx: &CallContext,
        request: &R,
    ) -> QuorumResult<R::Reply> {
        let challenge = Challenge::random();
        let command = PluginCommand {
            challenge: challenge.to_hex(),
            id: PLUGIN_ID.to_string(),
            command: R::COMMAND.to_string(),
            command_id: R::COMMAND.to_string(),
            payload: decred::encode_payload(request)?,
        };

        tracing::trace!(command = R::COMMAND, "Sending plugin command");
        let reply = with_deadline(ctx, R::COMMAND, self.store.plugin_command(command)).await?;

        // Nothing from an unverified reply is decoded.
        self.identity.verify(&challenge, &reply.response)?;

        Ok(decred::decode_reply::<R>(&reply.payload)?)
    }

    /// Fetch every comment of a proposal.
    pub async fn get_comments(&self, ctx: &CallContext, token: &Token) -> QuorumResult<Vec<Comment>> {
        let reply = self
            .execute(
                ctx,
                &GetComments {
                    token: token.clone(),
                },
            )
            .await?;
        tracing::trace!(token = %token, count = reply.comments.len(), "Loaded comments");
        Ok(reply.comments)
    }

    /// Fetch every like event of a proposal's comments.
    pub async fn get_comments_likes(
        &self,
        ctx: &CallContext,
        token: &Token,
    ) -> QuorumResult<Vec<LikeEvent>> {
        let reply = self
            .execute(
                ctx,
                &GetProposalCommentsLikes {
                    token: token.clone(),
                },
            )
            .await?;
        tracing::trace!(token = %token, count = reply.comments_likes.len(), "Loaded comment likes");
        Ok(reply.comments_likes)
    }
}

impl<S: RecordStore> Clone for RecordStoreClient<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            identity: self.identity.clone(),
        }
    }
}
