//! Quorum Storage - Proposal Inventory
//!
//! The in-memory cache in front of the record store. The record store stays
//! authoritative; this crate only holds what it returned, decoded and
//! indexed for the request path.

pub mod directory;
pub mod inventory;
pub mod sync;

pub use directory::{EmptyUserDirectory, InMemoryUserDirectory, UserAccount, UserDirectory};
pub use inventory::{
    load_record_metadata, select_page, tally_comment_likes, Inventory, InventoryEntry,
    InventoryState, LikesTally, LoadReport, ProposalStats, ProposalsRequest, SkipReason,
    SkippedStream, VoteCount, MD_STREAM_AUTHORIZE_VOTE, MD_STREAM_CHANGES, MD_STREAM_GENERAL,
    MD_STREAM_VOTE_BITS, MD_STREAM_VOTE_SNAPSHOT,
};
pub use sync::{InitReport, InventorySync};
