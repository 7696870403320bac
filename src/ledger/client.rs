// src/ledger/client.rs

//! Ledger client trait and JSON-RPC implementation

use crate::config::LedgerConfig;
use crate::ledger::LedgerError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

/// Capability trait for ledger backends
///
/// One submission attempt per call. `content_id` references bytes already
/// in distributed storage; `price` is denominated in the platform's
/// fungible unit and must be zero when `free` is set.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit an anchor record, returning the transaction reference
    async fn submit(
        &self,
        content_id: &str,
        creator: &str,
        price: u64,
        free: bool,
    ) -> Result<String, LedgerError>;

    /// Get a human-readable name for this client (for logging)
    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// JSON-RPC client for the ledger node
///
/// Calls the `registerModule` method with the anchor fields; the node owns
/// transaction construction and signing.
pub struct JsonRpcLedgerClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl JsonRpcLedgerClient {
    pub fn new(config: &LedgerConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LedgerError::Submission(format!("failed to create RPC client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn submit(
        &self,
        content_id: &str,
        creator: &str,
        price: u64,
        free: bool,
    ) -> Result<String, LedgerError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "registerModule",
            "params": {
                "contentId": content_id,
                "creator": creator,
                "price": price,
                "free": free,
            },
        });
        debug!("Submitting anchor for {content_id} to {}", self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Submission(format!("RPC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(LedgerError::Submission(format!(
                "HTTP {} from ledger node",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Submission(format!("bad RPC response: {e}")))?;

        if let Some(error) = body.error {
            return Err(LedgerError::Submission(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        body.result
            .filter(|tx| !tx.is_empty())
            .ok_or_else(|| LedgerError::Submission("RPC response missing result".to_string()))
    }

    fn name(&self) -> &str {
        "jsonrpc-ledger"
    }
}
