// src/config.rs

//! Pipeline configuration
//!
//! All tunables are explicit values threaded into the components that use
//! them (validator ceiling, collaborator endpoints and timeouts). There is
//! no ambient global configuration.

use crate::module::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default ceiling on a module's serialized size (50 MiB)
pub const DEFAULT_MAX_MODULE_SIZE: u64 = 50 * 1024 * 1024;

/// Default timeout for storage uploads
const DEFAULT_STORAGE_TIMEOUT_SECS: u64 = 60;

/// Default timeout for ledger submissions
const DEFAULT_LEDGER_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration (metaport.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hard ceiling on the serialized module document size in bytes
    #[serde(default = "default_max_module_size")]
    pub max_module_size_bytes: u64,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_module_size_bytes: DEFAULT_MAX_MODULE_SIZE,
            storage: StorageConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The validator's slice of this configuration
    pub fn validation(&self) -> ValidationConfig {
        ValidationConfig {
            max_module_size_bytes: self.max_module_size_bytes,
        }
    }
}

/// Storage collaborator endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the content-addressed storage gateway
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: Url,

    /// Upload timeout in seconds
    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_storage_endpoint(),
            timeout_secs: DEFAULT_STORAGE_TIMEOUT_SECS,
        }
    }
}

impl StorageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Ledger collaborator endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint of the ledger node
    #[serde(default = "default_ledger_endpoint")]
    pub endpoint: Url,

    /// Submission timeout in seconds
    #[serde(default = "default_ledger_timeout")]
    pub timeout_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ledger_endpoint(),
            timeout_secs: DEFAULT_LEDGER_TIMEOUT_SECS,
        }
    }
}

impl LedgerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_max_module_size() -> u64 {
    DEFAULT_MAX_MODULE_SIZE
}

fn default_storage_timeout() -> u64 {
    DEFAULT_STORAGE_TIMEOUT_SECS
}

fn default_ledger_timeout() -> u64 {
    DEFAULT_LEDGER_TIMEOUT_SECS
}

fn default_storage_endpoint() -> Url {
    // Local IPFS-style gateway
    Url::parse("http://127.0.0.1:5001").expect("static URL parses")
}

fn default_ledger_endpoint() -> Url {
    Url::parse("http://127.0.0.1:8899").expect("static URL parses")
}
