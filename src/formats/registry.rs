// src/formats/registry.rs

//! Source format registry and detection
//!
//! Centralized detection and dispatch for the supported source containers,
//! keyed by magic bytes with an explicit selector override.

use crate::formats::blockgame::BlockGameMod;
use crate::formats::bundle::AssetBundle;
use crate::formats::traits::ModuleSource;
use crate::formats::FormatError;
use crate::module::ModuleRecord;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Supported source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormatType {
    /// Block-game mod archive (gzip-compressed tar with a mod descriptor)
    BlockGame,
    /// 3D-engine asset bundle (UnityFS container)
    Bundle,
}

impl SourceFormatType {
    /// Get a human-readable name for the format
    pub fn name(&self) -> &'static str {
        match self {
            Self::BlockGame => "blockgame",
            Self::Bundle => "bundle",
        }
    }

    /// The parser implementation for this format
    pub fn parser(&self) -> &'static dyn ModuleSource {
        match self {
            Self::BlockGame => &BlockGameMod,
            Self::Bundle => &AssetBundle,
        }
    }

    /// All registered formats, in sniffing order
    pub fn all() -> &'static [SourceFormatType] {
        &[Self::BlockGame, Self::Bundle]
    }
}

impl fmt::Display for SourceFormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SourceFormatType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blockgame" => Ok(Self::BlockGame),
            "bundle" => Ok(Self::Bundle),
            _ => Err(FormatError::UnrecognizedContainer),
        }
    }
}

/// Detect the source format of a byte buffer by container signature
pub fn detect_format(bytes: &[u8]) -> Result<SourceFormatType, FormatError> {
    for format in SourceFormatType::all() {
        if format.parser().sniff(bytes) {
            return Ok(*format);
        }
    }
    Err(FormatError::UnrecognizedContainer)
}

/// Parse a source archive into a module record
///
/// With an explicit `format` the matching parser is used directly (and will
/// still refuse bytes that do not conform); otherwise the format is sniffed
/// from the container signature.
pub fn parse_module(
    bytes: &[u8],
    format: Option<SourceFormatType>,
) -> Result<(SourceFormatType, ModuleRecord), FormatError> {
    let format = match format {
        Some(format) => format,
        None => detect_format(bytes)?,
    };
    debug!("Parsing {} byte archive as {}", bytes.len(), format);
    let record = format.parser().parse(bytes)?;
    Ok((format, record))
}
