// src/module/codec.rs

//! Canonical interchange codec
//!
//! Encodes a module record to the JSON document persisted to disk and
//! uploaded to content-addressed storage. The encoding is deterministic:
//! struct fields serialize in declaration order and the metadata map is
//! sorted, so an unchanged record always produces byte-identical output and
//! hashes to the same content digest.

use crate::module::ModuleRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("failed to encode module record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("malformed module encoding: {0}")]
    MalformedEncoding(#[source] serde_json::Error),
}

/// Encode a record to canonical bytes
pub fn encode(record: &ModuleRecord) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(record).map_err(CodecError::Encode)
}

/// Encode a record as an indented document for humans (module.json exports)
///
/// Not canonical: only `encode` output feeds content addressing.
pub fn encode_pretty(record: &ModuleRecord) -> Result<String, CodecError> {
    serde_json::to_string_pretty(record).map_err(CodecError::Encode)
}

/// Decode canonical bytes back into a record
///
/// All fields are taken verbatim, including `id` and timestamps. Unknown
/// fields are rejected: the document carries exactly the record's fields.
pub fn decode(bytes: &[u8]) -> Result<ModuleRecord, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::MalformedEncoding)
}

/// Byte size of the record's canonical encoding
///
/// Computed from the actual encoded content, never estimated, since the
/// size ceiling is a hard gate.
pub fn encoded_size(record: &ModuleRecord) -> Result<u64, CodecError> {
    Ok(encode(record)?.len() as u64)
}
