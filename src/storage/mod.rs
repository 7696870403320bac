// src/storage/mod.rs

//! Content-addressed storage collaborator
//!
//! The pipeline consumes storage through the `StorageClient` capability
//! trait: upload bytes, get back an opaque content identifier. The
//! `ContentAddresser` owns the digest computation and the upload timeout;
//! transport concerns (retries, pooling) belong to the client
//! implementation behind the trait.

pub mod addresser;
pub mod client;

use thiserror::Error;

pub use addresser::{AddressedContent, ContentAddresser};
pub use client::{HttpStorageClient, StorageClient};

#[derive(Error, Debug)]
pub enum StorageError {
    /// The collaborator could not be reached or did not answer in time
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with something unusable
    #[error("storage response invalid: {0}")]
    InvalidResponse(String),
}
