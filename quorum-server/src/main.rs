//! Quorum Server Entry Point
//!
//! Loads configuration, builds the proposal inventory from the record store,
//! and holds it until shutdown.

mod error;
mod telemetry;
mod users;

use std::sync::Arc;

use quorum_core::{InventoryConfig, RecordStoreConfig};
use quorum_rpc::{CallContext, HttpRecordStore, RecordStoreClient, ServerIdentity};
use quorum_storage::{Inventory, InventorySync};

use error::ServerResult;
use telemetry::{init_tracing, TelemetryConfig};
use users::load_user_directory;

#[tokio::main]
async fn main() -> ServerResult<()> {
    init_tracing(&TelemetryConfig::from_env())?;

    let inventory_config = InventoryConfig::from_env();
    let store_config = RecordStoreConfig::from_env()?;
    let identity = ServerIdentity::from_hex(&store_config.identity)?;

    let store = Arc::new(HttpRecordStore::new(&store_config)?);
    tracing::info!(
        base_url = %store.base_url(),
        page_size = inventory_config.page_size,
        "Connecting to record store"
    );

    let directory = Arc::new(load_user_directory()?);
    let inventory = Arc::new(Inventory::new(inventory_config, directory));
    let sync = InventorySync::new(
        Arc::clone(&inventory),
        RecordStoreClient::new(store, identity),
    );

    let ctx = CallContext::with_timeout(store_config.request_timeout);
    let report = sync.initialize(&ctx).await?;
    for (token, e) in &report.comment_failures {
        tracing::warn!(token = %token, error = %e, "Proposal served without comments");
    }

    let stats = inventory.inventory_stats()?;
    tracing::info!(
        proposals = report.records,
        public = stats.public,
        unvetted = stats.unvetted,
        unvetted_changes = stats.unvetted_changes,
        censored = stats.censored,
        abandoned = stats.abandoned,
        invalid = stats.invalid,
        "Inventory ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    Ok(())
}
