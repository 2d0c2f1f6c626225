//! Request and reply bodies exchanged with the record store.

use quorum_core::Record;
use serde::{Deserialize, Serialize};

/// Route of the bulk inventory fetch.
pub const INVENTORY_ROUTE: &str = "/v1/inventory/";

/// Route of the generic plugin command.
pub const PLUGIN_COMMAND_ROUTE: &str = "/v1/plugin/";

/// Bulk inventory request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRequest {
    /// Hex encoded random challenge.
    pub challenge: String,
    #[serde(rename = "includefiles")]
    pub include_files: bool,
    /// Number of vetted records to return, zero for all.
    #[serde(rename = "vettedcount")]
    pub vetted_count: u32,
    /// Number of unvetted records to return, zero for all.
    #[serde(rename = "branchescount")]
    pub branches_count: u32,
}

/// Bulk inventory reply, partitioned by visibility class.
///
/// Records stay as raw JSON until [`InventoryReply::decode_records`] so one
/// malformed record cannot fail the whole reply.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryReply {
    /// Hex encoded signature over the request challenge.
    pub response: String,
    #[serde(default)]
    pub vetted: Vec<serde_json::Value>,
    #[serde(default)]
    pub branches: Vec<serde_json::Value>,
}

/// Records decoded from an [`InventoryReply`].
#[derive(Debug, Clone, Default)]
pub struct InventoryRecords {
    /// Decoded records, vetted first.
    pub records: Vec<Record>,
    /// Entries that did not decode as a record.
    pub rejected: usize,
}

impl InventoryReply {
    /// Build a reply from already typed records.
    pub fn from_records(
        response: impl Into<String>,
        vetted: &[Record],
        branches: &[Record],
    ) -> serde_json::Result<Self> {
        let encode = |records: &[Record]| {
            records
                .iter()
                .map(serde_json::to_value)
                .collect::<serde_json::Result<Vec<_>>>()
        };
        Ok(Self {
            response: response.into(),
            vetted: encode(vetted)?,
            branches: encode(branches)?,
        })
    }

    /// Decode every record, vetted first. Entries that fail to decode are
    /// logged and counted, never fatal.
    pub fn decode_records(self) -> InventoryRecords {
        let mut out = InventoryRecords::default();
        let partitions = [("vetted", self.vetted), ("branches", self.branches)];
        for (partition, values) in partitions {
            for (index, value) in values.into_iter().enumerate() {
                match serde_json::from_value::<Record>(value) {
                    Ok(record) => out.records.push(record),
                    Err(e) => {
                        tracing::error!(partition, index, error = %e, "Skipping undecodable record");
                        out.rejected += 1;
                    }
                }
            }
        }
        out
    }
}

/// Generic plugin command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCommand {
    /// Hex encoded random challenge.
    pub challenge: String,
    /// Plugin identifier.
    pub id: String,
    pub command: String,
    #[serde(rename = "commandid")]
    pub command_id: String,
    /// Command specific JSON payload.
    pub payload: String,
}

/// Reply to a plugin command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginCommandReply {
    /// Hex encoded signature over the request challenge.
    pub response: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub command: String,
    #[serde(rename = "commandid", default)]
    pub command_id: String,
    /// Command specific JSON payload.
    #[serde(default)]
    pub payload: String,
}
