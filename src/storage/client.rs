// src/storage/client.rs

//! Storage client trait and HTTP implementation

use crate::config::StorageConfig;
use crate::storage::StorageError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Capability trait for content-addressed storage backends
///
/// Implementations perform exactly one upload attempt per call; any retry
/// policy lives inside the implementation, never in the pipeline.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload bytes, returning the backend's content identifier
    async fn upload(&self, bytes: &[u8]) -> Result<String, StorageError>;

    /// Get a human-readable name for this client (for logging)
    fn name(&self) -> &str;
}

/// Upload response from the storage gateway
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    content_id: String,
}

/// HTTP client for an IPFS-style storage gateway
///
/// Speaks a minimal REST surface: `POST {endpoint}/v1/content` with the raw
/// bytes as the body, answered with `{"contentId": "..."}`.
pub struct HttpStorageClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpStorageClient {
    pub fn new(config: &StorageConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StorageError::Unavailable(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1/content",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl StorageClient for HttpStorageClient {
    async fn upload(&self, bytes: &[u8]) -> Result<String, StorageError> {
        let url = self.upload_url();
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::Unavailable(format!("upload to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(StorageError::Unavailable(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(format!("bad upload response: {e}")))?;

        Ok(body.content_id)
    }

    fn name(&self) -> &str {
        "http-storage"
    }
}
