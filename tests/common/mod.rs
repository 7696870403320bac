// tests/common/mod.rs

//! Shared test utilities: archive builders and recording fake collaborators.

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use metaport::hash::ContentDigest;
use metaport::ledger::{LedgerClient, LedgerError};
use metaport::storage::{StorageClient, StorageError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Build a gzipped tar mod archive from (path, content) pairs
pub fn build_mod_archive(descriptor: Option<&str>, entries: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    if let Some(descriptor) = descriptor {
        append_entry(&mut builder, "mcmod.info", descriptor.as_bytes());
    }
    for (path, content) in entries {
        append_entry(&mut builder, path, content);
    }

    builder.into_inner().unwrap().finish().unwrap()
}

fn append_entry<W: std::io::Write>(builder: &mut tar::Builder<W>, path: &str, content: &[u8]) {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, content).unwrap();
}

/// Descriptor for a small RPG mod used across scenarios
pub const RPG_DESCRIPTOR: &str = r#"[{
    "modid": "testrpg",
    "name": "Test RPG",
    "version": "1.0.0",
    "description": "Integration test module",
    "authorList": ["testdev"]
}]"#;

/// Storage fake: counts uploads, captures the last document, and derives a
/// deterministic content identifier from the uploaded bytes.
pub struct RecordingStorage {
    pub uploads: AtomicUsize,
    pub last_upload: Mutex<Option<Vec<u8>>>,
    pub fail: bool,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            last_upload: Mutex::new(None),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageClient for RecordingStorage {
    async fn upload(&self, bytes: &[u8]) -> Result<String, StorageError> {
        if self.fail {
            return Err(StorageError::Unavailable("fake storage is down".to_string()));
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        *self.last_upload.lock().unwrap() = Some(bytes.to_vec());
        Ok(format!(
            "bafy{}",
            &ContentDigest::compute(bytes).as_hex()[..16]
        ))
    }

    fn name(&self) -> &str {
        "recording-storage"
    }
}

/// Ledger fake: counts submissions and captures the last anchor record.
pub struct RecordingLedger {
    pub submissions: AtomicUsize,
    pub last_anchor: Mutex<Option<(String, String, u64, bool)>>,
    pub fail: bool,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self {
            submissions: AtomicUsize::new(0),
            last_anchor: Mutex::new(None),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for RecordingLedger {
    async fn submit(
        &self,
        content_id: &str,
        creator: &str,
        price: u64,
        free: bool,
    ) -> Result<String, LedgerError> {
        if self.fail {
            return Err(LedgerError::Submission("fake RPC node is down".to_string()));
        }
        self.submissions.fetch_add(1, Ordering::SeqCst);
        *self.last_anchor.lock().unwrap() = Some((
            content_id.to_string(),
            creator.to_string(),
            price,
            free,
        ));
        Ok(format!(
            "0x{}",
            &ContentDigest::compute(content_id.as_bytes()).as_hex()[..16]
        ))
    }

    fn name(&self) -> &str {
        "recording-ledger"
    }
}
