// src/module/mod.rs

//! The normalized module data model
//!
//! A module is the unit of content exchanged by the system: one record per
//! converted source archive, with four fixed content layers, open metadata,
//! and creation/update timestamps. Parsers produce records, the validator
//! gates them, the codec turns them into the canonical interchange document.

pub mod codec;
pub mod record;
pub mod validate;

pub use codec::{decode, encode, encode_pretty, encoded_size, CodecError};
pub use record::{
    Category, LayerItem, LayerKind, ModuleDraft, ModuleLayers, ModuleRecord, INITIAL_VERSION,
    SCHEMA_VERSION,
};
pub use validate::{ValidationConfig, ValidationError, Validator};
