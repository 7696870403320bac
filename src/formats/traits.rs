// src/formats/traits.rs

//! Capability trait for source-format parsers

use crate::formats::{FormatError, SourceFormatType};
use crate::module::ModuleRecord;

/// Common interface for all source formats
///
/// A parser is a pure function from raw bytes to a module record. It must
/// not interpret bytes it cannot recognize: `parse` fails with a
/// `FormatError` rather than guessing. The returned record always has
/// `name` and `creator` set (extracted or placeholder) so it is
/// constructible; rejection of placeholder values is the validator's job.
pub trait ModuleSource: Send + Sync {
    /// The format tag this parser handles
    fn format(&self) -> SourceFormatType;

    /// Whether the container signature matches this format
    fn sniff(&self, bytes: &[u8]) -> bool;

    /// Parse raw container bytes into a module record
    ///
    /// Content that cannot be mapped to one of the four layers is preserved
    /// in record metadata under a format-specific key, never discarded.
    fn parse(&self, bytes: &[u8]) -> Result<ModuleRecord, FormatError>;
}
