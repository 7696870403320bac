// src/hash.rs

//! Content digests for module addressing
//!
//! The canonical module document is hashed with SHA-256 before it is handed
//! to the storage collaborator. The digest is what makes an encoding
//! verifiable: identical logical content must produce identical bytes and
//! therefore an identical digest (see the codec determinism tests).

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Digest parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid digest length: expected {expected} hex chars, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex in digest: {0}")]
    InvalidHex(String),
}

/// Hex length of a SHA-256 digest
const SHA256_HEX_LEN: usize = 64;

/// A SHA-256 content digest, stored as a lowercase hex string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    value: String,
}

impl ContentDigest {
    /// Compute the digest of a byte slice
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self {
            value: hex::encode(hasher.finalize()),
        }
    }

    /// Construct from an existing hex string, validating shape
    pub fn from_hex(value: impl Into<String>) -> Result<Self, DigestError> {
        let value: String = value.into();
        if value.len() != SHA256_HEX_LEN {
            return Err(DigestError::InvalidLength {
                expected: SHA256_HEX_LEN,
                got: value.len(),
            });
        }
        if !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestError::InvalidHex(value));
        }
        Ok(Self {
            value: value.to_lowercase(),
        })
    }

    /// The digest as a bare hex string
    #[inline]
    pub fn as_hex(&self) -> &str {
        &self.value
    }

    /// Format as a prefixed string (e.g. "sha256:abc123...")
    pub fn to_prefixed_string(&self) -> String {
        format!("sha256:{}", self.value)
    }

    /// Parse a prefixed digest string ("sha256:abc123...")
    ///
    /// Unprefixed strings are accepted as bare SHA-256 hex.
    pub fn parse_prefixed(s: &str) -> Result<Self, DigestError> {
        match s.split_once(':') {
            Some(("sha256", hex)) => Self::from_hex(hex),
            Some((algo, _)) => Err(DigestError::UnknownAlgorithm(algo.to_string())),
            None => Self::from_hex(s),
        }
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl FromStr for ContentDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_prefixed(s)
    }
}

/// Digest mismatch between expected and recomputed content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sha256 mismatch: expected {expected}, got {actual}")]
pub struct DigestMismatch {
    pub expected: String,
    pub actual: String,
}

/// Verify bytes match an expected digest
pub fn verify_bytes(data: &[u8], expected: &ContentDigest) -> Result<(), DigestMismatch> {
    let actual = ContentDigest::compute(data);
    if actual == *expected {
        Ok(())
    } else {
        Err(DigestMismatch {
            expected: expected.as_hex().to_string(),
            actual: actual.value,
        })
    }
}
