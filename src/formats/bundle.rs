// src/formats/bundle.rs

//! 3D-engine asset bundle parser (UnityFS container)
//!
//! Reads the bundle header (signature, format version, engine version) and,
//! when the directory info is stored uncompressed, the node table. Node
//! paths are classified into module layers by extension; the header facts
//! always land in record metadata so nothing is silently lost when the
//! directory is compressed and out of reach.

use crate::formats::traits::ModuleSource;
use crate::formats::{FormatError, SourceFormatType};
use crate::module::{LayerItem, LayerKind, ModuleDraft, ModuleRecord};
use serde_json::json;
use tracing::debug;

const BUNDLE_SIGNATURE: &[u8] = b"UnityFS";

const FORMAT_NAME: &str = "bundle";

const PLACEHOLDER_NAME: &str = "Unnamed asset bundle";

const PLACEHOLDER_CREATOR: &str = "unknown";

/// Compression scheme bits in the header flags
const FLAG_COMPRESSION_MASK: u32 = 0x3F;

/// Directory info lives at the end of the file instead of after the header
const FLAG_INFO_AT_END: u32 = 0x80;

fn corrupt(detail: impl Into<String>) -> FormatError {
    FormatError::Corrupt {
        format: FORMAT_NAME,
        detail: detail.into(),
    }
}

/// Big-endian reader over the bundle bytes
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| corrupt("unexpected end of header"))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    /// Read a null-terminated string
    fn read_cstr(&mut self) -> Result<String, FormatError> {
        let rest = self
            .buf
            .get(self.pos..)
            .ok_or_else(|| corrupt("unexpected end of header"))?;
        let len = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| corrupt("unterminated string in header"))?;
        let s = String::from_utf8_lossy(&rest[..len]).into_owned();
        self.pos += len + 1;
        Ok(s)
    }

    fn read_u16_be(&mut self) -> Result<u16, FormatError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32_be(&mut self) -> Result<u32, FormatError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i64_be(&mut self) -> Result<i64, FormatError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(raw))
    }

    /// Advance to the next 16-byte boundary (format version 7+)
    fn align16(&mut self) {
        self.pos = (self.pos + 15) & !15;
    }
}

/// 3D-engine asset bundle parser
pub struct AssetBundle;

impl ModuleSource for AssetBundle {
    fn format(&self) -> SourceFormatType {
        SourceFormatType::Bundle
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        bytes.len() > BUNDLE_SIGNATURE.len()
            && bytes.starts_with(BUNDLE_SIGNATURE)
            && bytes[BUNDLE_SIGNATURE.len()] == 0
    }

    fn parse(&self, bytes: &[u8]) -> Result<ModuleRecord, FormatError> {
        if !self.sniff(bytes) {
            return Err(FormatError::UnrecognizedContainer);
        }

        let mut reader = Reader::new(bytes);
        let _signature = reader.read_cstr()?;
        let format_version = reader.read_u32_be()?;
        let player_version = reader.read_cstr()?;
        let engine_version = reader.read_cstr()?;
        let _total_size = reader.read_i64_be()?;
        let info_size = reader.read_u32_be()?;
        let _uncompressed_info_size = reader.read_u32_be()?;
        let flags = reader.read_u32_be()?;

        if format_version >= 7 {
            reader.align16();
        }

        let compression = flags & FLAG_COMPRESSION_MASK;
        let info_at_end = flags & FLAG_INFO_AT_END != 0;

        let mut draft = ModuleDraft {
            name: PLACEHOLDER_NAME.to_string(),
            creator: PLACEHOLDER_CREATOR.to_string(),
            ..Default::default()
        };
        draft
            .metadata
            .insert("unity.formatVersion".to_string(), json!(format_version));
        draft
            .metadata
            .insert("unity.playerVersion".to_string(), json!(player_version));
        draft
            .metadata
            .insert("unity.engineVersion".to_string(), json!(engine_version));

        if compression == 0 && !info_at_end {
            let info = reader.take(info_size as usize)?;
            let mut unmapped = Vec::new();
            read_directory(info, &mut draft, &mut unmapped)?;
            if !unmapped.is_empty() {
                draft
                    .metadata
                    .insert("unity.unmapped".to_string(), json!(unmapped));
            }
        } else {
            // Compressed or trailing directory: header facts only
            debug!(
                "Asset bundle directory not readable (compression {}, at end: {})",
                compression, info_at_end
            );
        }

        debug!(
            "Parsed asset bundle (engine {}): {} layer items",
            engine_version,
            draft.layers.item_count()
        );
        Ok(ModuleRecord::from_draft(draft))
    }
}

/// Read the uncompressed blocks-info table and classify its nodes
fn read_directory(
    info: &[u8],
    draft: &mut ModuleDraft,
    unmapped: &mut Vec<String>,
) -> Result<(), FormatError> {
    let mut reader = Reader::new(info);
    let _data_hash = reader.take(16)?;

    let block_count = reader.read_u32_be()?;
    for _ in 0..block_count {
        let _uncompressed = reader.read_u32_be()?;
        let _compressed = reader.read_u32_be()?;
        let _flags = reader.read_u16_be()?;
    }

    let node_count = reader.read_u32_be()?;
    for _ in 0..node_count {
        let _offset = reader.read_i64_be()?;
        let size = reader.read_i64_be()?;
        let _flags = reader.read_u32_be()?;
        let path = reader.read_cstr()?;

        match classify_node(&path) {
            Some(kind) => draft.layers.push(
                kind,
                LayerItem {
                    path,
                    size: size.max(0) as u64,
                    sha256: None,
                },
            ),
            None => unmapped.push(path),
        }
    }

    Ok(())
}

/// Map an asset node path to a module layer by extension
fn classify_node(path: &str) -> Option<LayerKind> {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension {
        "unity" | "terrainlayer" => Some(LayerKind::Terrain),
        "prefab" | "fbx" | "anim" | "mesh" => Some(LayerKind::Character),
        "dll" | "cs" => Some(LayerKind::Logic),
        "inputactions" | "guiskin" => Some(LayerKind::Interaction),
        _ => None,
    }
}
