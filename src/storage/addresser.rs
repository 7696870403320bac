// src/storage/addresser.rs

//! Content addressing for encoded module documents

use crate::hash::ContentDigest;
use crate::storage::{StorageClient, StorageError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// The outcome of addressing an encoded document
#[derive(Debug, Clone)]
pub struct AddressedContent {
    /// The storage collaborator's identifier for the uploaded bytes
    pub content_id: String,
    /// Locally computed digest of the same bytes
    pub digest: ContentDigest,
}

/// Computes content digests and hands bytes to the storage collaborator
pub struct ContentAddresser {
    client: Arc<dyn StorageClient>,
    timeout: Duration,
}

impl ContentAddresser {
    pub fn new(client: Arc<dyn StorageClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Address encoded bytes: digest locally, upload, return the identifier
    ///
    /// One attempt; a stuck upload is cut off at the configured timeout and
    /// surfaced as `StorageError::Unavailable` rather than hanging the
    /// pipeline.
    pub async fn address(&self, bytes: &[u8]) -> crate::Result<AddressedContent> {
        let digest = ContentDigest::compute(bytes);
        debug!(
            "Addressing {} bytes ({}) via {}",
            bytes.len(),
            digest.to_prefixed_string(),
            self.client.name()
        );

        let content_id = tokio::time::timeout(self.timeout, self.client.upload(bytes))
            .await
            .map_err(|_| {
                StorageError::Unavailable(format!(
                    "upload timed out after {}s",
                    self.timeout.as_secs()
                ))
            })??;

        if content_id.is_empty() {
            return Err(StorageError::InvalidResponse(
                "collaborator returned an empty content identifier".to_string(),
            )
            .into());
        }

        info!("Content addressed: {content_id}");
        Ok(AddressedContent { content_id, digest })
    }
}
