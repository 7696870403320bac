// src/lib.rs

//! Metaport module conversion pipeline
//!
//! Converts external game-content archives (block-game mod archives, engine
//! asset bundles) into normalized, versioned module records that can be
//! content-addressed on distributed storage and anchored on a ledger.
//!
//! # Architecture
//!
//! - Module records: one canonical data model surviving every source format
//! - Format parsers: capability trait + registry, sniffed by container magic
//! - Validation gate: structural and size invariants enforced before any
//!   byte is persisted or paid for
//! - Canonical codec: deterministic JSON interchange document, hashed for
//!   content addressing
//! - Collaborators: storage upload and ledger anchoring behind async traits,
//!   single attempt per stage, timeouts owned by the pipeline configuration

pub mod config;
mod error;
pub mod formats;
pub mod hash;
pub mod ledger;
pub mod module;
pub mod pipeline;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use formats::{FormatError, SourceFormatType};
pub use hash::ContentDigest;
pub use ledger::{AnchorTerms, LedgerAnchor, LedgerClient};
pub use module::{
    Category, CodecError, LayerItem, LayerKind, ModuleDraft, ModuleLayers, ModuleRecord,
    ValidationConfig, ValidationError, Validator,
};
pub use pipeline::{ConversionPipeline, ConversionReceipt, PipelineError, PublishTerms, Stage};
pub use storage::{AddressedContent, ContentAddresser, StorageClient};
