// src/formats/blockgame.rs

//! Block-game mod archive parser
//!
//! Parses gzip-compressed tar mod archives, extracting metadata from the
//! `mcmod.info` descriptor and classifying content entries into module
//! layers by path convention. Entries that fit no layer are listed under
//! the `blockgame.unmapped` metadata key instead of being dropped.

use crate::formats::traits::ModuleSource;
use crate::formats::{FormatError, SourceFormatType};
use crate::hash::ContentDigest;
use crate::module::{LayerItem, LayerKind, ModuleDraft, ModuleRecord};
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde_json::json;
use std::io::Read;
use tar::Archive;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Mod descriptor entry name inside the archive
const DESCRIPTOR_NAME: &str = "mcmod.info";

const FORMAT_NAME: &str = "blockgame";

/// Name used when the archive carries no usable descriptor
const PLACEHOLDER_NAME: &str = "Unnamed block-game mod";

/// Creator used until the publisher assigns a wallet
const PLACEHOLDER_CREATOR: &str = "unknown";

/// Parsed `mcmod.info` content (either a bare object or a one-element list)
#[derive(Debug, Default, Deserialize)]
struct ModDescriptor {
    #[serde(default)]
    modid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "authorList", default)]
    author_list: Vec<String>,
}

fn corrupt(detail: impl Into<String>) -> FormatError {
    FormatError::Corrupt {
        format: FORMAT_NAME,
        detail: detail.into(),
    }
}

/// Block-game mod archive parser
pub struct BlockGameMod;

impl ModuleSource for BlockGameMod {
    fn format(&self) -> SourceFormatType {
        SourceFormatType::BlockGame
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 2 && bytes[0..2] == GZIP_MAGIC
    }

    fn parse(&self, bytes: &[u8]) -> Result<ModuleRecord, FormatError> {
        if !self.sniff(bytes) {
            return Err(FormatError::UnrecognizedContainer);
        }

        let mut archive = Archive::new(GzDecoder::new(bytes));
        let mut descriptor: Option<ModDescriptor> = None;
        let mut draft = ModuleDraft::default();
        let mut unmapped: Vec<String> = Vec::new();

        let entries = archive
            .entries()
            .map_err(|e| corrupt(format!("failed to read archive entries: {e}")))?;

        for entry in entries {
            let mut entry = entry.map_err(|e| corrupt(format!("failed to read entry: {e}")))?;

            if entry.header().entry_type().is_dir() {
                continue;
            }

            let path = entry
                .path()
                .map_err(|e| corrupt(format!("failed to read entry path: {e}")))?
                .to_string_lossy()
                .trim_start_matches("./")
                .to_string();

            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .map_err(|e| corrupt(format!("failed to read {path}: {e}")))?;

            if path == DESCRIPTOR_NAME {
                descriptor = Some(parse_descriptor(&content)?);
                continue;
            }

            match classify_entry(&path) {
                Some(kind) => {
                    let item = LayerItem {
                        size: content.len() as u64,
                        sha256: Some(ContentDigest::compute(&content).as_hex().to_string()),
                        path,
                    };
                    draft.layers.push(kind, item);
                }
                None => unmapped.push(path),
            }
        }

        let descriptor = descriptor.unwrap_or_default();
        debug!(
            "Parsed block-game mod \"{}\": {} layer items, {} unmapped entries",
            descriptor.name,
            draft.layers.item_count(),
            unmapped.len()
        );

        draft.name = if descriptor.name.is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            descriptor.name
        };
        draft.creator = descriptor
            .author_list
            .into_iter()
            .next()
            .unwrap_or_else(|| PLACEHOLDER_CREATOR.to_string());
        if !descriptor.version.is_empty() {
            draft.version = Some(descriptor.version);
        }
        if !descriptor.description.is_empty() {
            draft.description = Some(descriptor.description);
        }
        if !descriptor.modid.is_empty() {
            draft
                .metadata
                .insert("blockgame.modid".to_string(), json!(descriptor.modid));
        }
        if !unmapped.is_empty() {
            draft
                .metadata
                .insert("blockgame.unmapped".to_string(), json!(unmapped));
        }

        Ok(ModuleRecord::from_draft(draft))
    }
}

/// Parse the descriptor, accepting the list form or a bare object
fn parse_descriptor(bytes: &[u8]) -> Result<ModDescriptor, FormatError> {
    serde_json::from_slice::<Vec<ModDescriptor>>(bytes)
        .map(|list| list.into_iter().next().unwrap_or_default())
        .or_else(|_| serde_json::from_slice::<ModDescriptor>(bytes))
        .map_err(|e| corrupt(format!("invalid {DESCRIPTOR_NAME}: {e}")))
}

/// Map an archive entry path to a module layer
///
/// Top-level directory wins; file extension is the fallback. Unmatched
/// entries return `None` and are preserved in metadata by the caller.
fn classify_entry(path: &str) -> Option<LayerKind> {
    let top = path.split('/').next().unwrap_or("");
    match top {
        "structures" | "world" | "worldgen" | "terrain" => return Some(LayerKind::Terrain),
        "entities" | "models" | "skins" | "mobs" => return Some(LayerKind::Character),
        "scripts" | "functions" | "ai" => return Some(LayerKind::Logic),
        "recipes" | "keybinds" | "interactions" | "advancements" => {
            return Some(LayerKind::Interaction)
        }
        _ => {}
    }

    let extension = path.rsplit_once('.').map(|(_, ext)| ext)?;
    match extension {
        "schematic" | "nbt" | "mca" => Some(LayerKind::Terrain),
        "class" | "lua" | "mcfunction" => Some(LayerKind::Logic),
        _ => None,
    }
}
