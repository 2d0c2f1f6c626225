//! Record store abstraction.

use async_trait::async_trait;
use quorum_core::QuorumResult;

use crate::wire::{InventoryReply, InventoryRequest, PluginCommand, PluginCommandReply};

/// The authoritative record store.
///
/// Implementations only move bytes: they do not verify challenge responses.
/// Verification is the caller's job (see [`crate::RecordStoreClient`]), so a
/// compromised transport cannot vouch for itself.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every known record, partitioned by visibility class.
    async fn inventory(&self, request: InventoryRequest) -> QuorumResult<InventoryReply>;

    /// Execute a plugin command.
    async fn plugin_command(&self, command: PluginCommand) -> QuorumResult<PluginCommandReply>;
}
