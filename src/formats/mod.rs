// src/formats/mod.rs

//! Source format support
//!
//! One parser per supported external container, each implementing the
//! `ModuleSource` trait. The registry sniffs container signatures and
//! dispatches; adding a format means adding a variant and a parser, never
//! touching the validator or any downstream stage.

pub mod blockgame;
pub mod bundle;
pub mod registry;
pub mod traits;

use thiserror::Error;

pub use blockgame::BlockGameMod;
pub use bundle::AssetBundle;
pub use registry::{detect_format, parse_module, SourceFormatType};
pub use traits::ModuleSource;

#[derive(Error, Debug)]
pub enum FormatError {
    /// No parser recognizes the container signature
    #[error("unrecognized source container")]
    UnrecognizedContainer,

    /// The container signature matched but the content does not conform
    #[error("corrupt {format} archive: {detail}")]
    Corrupt {
        format: &'static str,
        detail: String,
    },
}
