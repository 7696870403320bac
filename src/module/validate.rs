// src/module/validate.rs

//! Validation gate for module records
//!
//! Every record passes through here before it may be serialized, uploaded,
//! or anchored. Validation is pure: no I/O, no mutation, and the same record
//! with the same configuration always produces the same verdict.

use crate::module::record::{meta, ModuleRecord, SCHEMA_VERSION};
use crate::module::codec;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("module too large: {actual} bytes (max: {limit} bytes)")]
    SizeExceeded { actual: u64, limit: u64 },

    #[error("unsupported schema version: {declared} (supported: {supported})")]
    SchemaVersionMismatch {
        declared: String,
        supported: String,
    },
}

/// Validator configuration, threaded in explicitly
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Hard ceiling on the serialized record size in bytes
    pub max_module_size_bytes: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_module_size_bytes: crate::config::DEFAULT_MAX_MODULE_SIZE,
        }
    }
}

/// Enforces structural and size invariants on module records
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a record against structural and size constraints
    ///
    /// Field checks run before the size check, so an empty name or creator
    /// is reported as `MissingField` regardless of how large the record is.
    pub fn validate(&self, record: &ModuleRecord) -> crate::Result<()> {
        if record.name.is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        if record.creator.is_empty() {
            return Err(ValidationError::MissingField("creator").into());
        }

        self.check_schema_version(record)?;

        let actual = codec::encoded_size(record)?;
        let limit = self.config.max_module_size_bytes;
        if actual > limit {
            return Err(ValidationError::SizeExceeded { actual, limit }.into());
        }

        Ok(())
    }

    /// Cross-check a declared schema version, when the record carries one
    ///
    /// A declared version must parse as semver and share the supported
    /// major version. Records without a declaration pass.
    fn check_schema_version(&self, record: &ModuleRecord) -> Result<(), ValidationError> {
        let Some(declared) = record.metadata.get(meta::SCHEMA_VERSION) else {
            return Ok(());
        };

        let mismatch = |declared: String| ValidationError::SchemaVersionMismatch {
            declared,
            supported: SCHEMA_VERSION.to_string(),
        };

        let Some(declared) = declared.as_str() else {
            return Err(mismatch(declared.to_string()));
        };

        let supported =
            semver::Version::parse(SCHEMA_VERSION).expect("schema version constant parses");
        match semver::Version::parse(declared) {
            Ok(version) if version.major == supported.major => Ok(()),
            _ => Err(mismatch(declared.to_string())),
        }
    }
}
