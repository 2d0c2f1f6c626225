//! HTTP transport to the record store.

use async_trait::async_trait;
use quorum_core::{QuorumResult, RecordStoreConfig, RpcError};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::store::RecordStore;
use crate::wire::{
    InventoryReply, InventoryRequest, PluginCommand, PluginCommandReply, INVENTORY_ROUTE,
    PLUGIN_COMMAND_ROUTE,
};

/// Record store reached over HTTP with JSON bodies.
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl HttpRecordStore {
    /// Create a transport from configuration.
    pub fn new(config: &RecordStoreConfig) -> QuorumResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RpcError::Transport {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        let credentials = match (&config.user, &config.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<Req: Serialize, Res: DeserializeOwned>(
        &self,
        route: &str,
        body: &Req,
    ) -> QuorumResult<Res> {
        let url = format!("{}{}", self.base_url, route);
        let mut request = self.client.post(&url).json(body);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await.map_err(|e| RpcError::Transport {
            reason: format!("POST {} failed: {}", route, e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(route, status = status.as_u16(), "Record store returned an error");
            return Err(RpcError::Status {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let reply = response.json().await.map_err(|e| RpcError::InvalidResponse {
            reason: format!("Failed to parse {} reply: {}", route, e),
        })?;
        Ok(reply)
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn inventory(&self, request: InventoryRequest) -> QuorumResult<InventoryReply> {
        self.post(INVENTORY_ROUTE, &request).await
    }

    async fn plugin_command(&self, command: PluginCommand) -> QuorumResult<PluginCommandReply> {
        self.post(PLUGIN_COMMAND_ROUTE, &command).await
    }
}

impl std::fmt::Debug for HttpRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordStore")
            .field("base_url", &self.base_url)
            .field(
                "credentials",
                &self.credentials.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
