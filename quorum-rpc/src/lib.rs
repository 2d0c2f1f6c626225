//! Quorum RPC - Record Store Protocol
//!
//! Wire bodies of the record store, the nonce challenge-response handshake,
//! the `decred` plugin commands, and an HTTP transport. Callers use
//! [`RecordStoreClient`], which refuses every reply whose challenge response
//! does not verify against the configured server identity.

pub mod challenge;
pub mod client;
pub mod decred;
pub mod http;
pub mod store;
pub mod wire;

pub use challenge::{Challenge, ServerIdentity, CHALLENGE_SIZE};
pub use client::{with_deadline, CallContext, RecordStoreClient};
pub use decred::{
    GetComments, GetCommentsReply, GetProposalCommentsLikes, GetProposalCommentsLikesReply,
    PluginRequest, CMD_GET_COMMENTS, CMD_PROPOSAL_COMMENTS_LIKES, PLUGIN_ID,
};
pub use http::HttpRecordStore;
pub use store::RecordStore;
pub use wire::{
    InventoryRecords, InventoryReply, InventoryRequest, PluginCommand, PluginCommandReply, INVENTORY_ROUTE,
    PLUGIN_COMMAND_ROUTE,
};
