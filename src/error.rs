// src/error.rs

//! Crate-wide error type
//!
//! Each pipeline subsystem defines its own typed error; this module unifies
//! them so stages can propagate failures to the orchestrator with `?`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Source bytes were unrecognized or corrupt
    #[error(transparent)]
    Format(#[from] crate::formats::FormatError),

    /// A module record failed the validation gate
    #[error(transparent)]
    Validation(#[from] crate::module::ValidationError),

    /// Canonical encoding or decoding failed
    #[error(transparent)]
    Codec(#[from] crate::module::CodecError),

    /// The storage collaborator could not take the upload
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    /// The ledger collaborator rejected or lost the submission
    #[error(transparent)]
    Ledger(#[from] crate::ledger::LedgerError),

    #[error("invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("invalid semantic version: {0}")]
    Version(#[from] semver::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether re-running the conversion from the top can reasonably succeed.
    ///
    /// Collaborator failures (storage, ledger) are transient service
    /// conditions; everything else means the input itself is bad.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(_) | Error::Ledger(_))
    }
}
