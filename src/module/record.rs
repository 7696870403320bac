// src/module/record.rs

//! Module record: the canonical representation of converted content

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Schema version of the interchange document
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Version assigned to a freshly converted module
pub const INITIAL_VERSION: &str = "1.0.0";

/// Well-known metadata keys written by the pipeline
pub mod meta {
    /// Marker for the source container format ("blockgame", "bundle")
    pub const SOURCE_FORMAT: &str = "sourceFormat";
    /// "paid" or "free"
    pub const ISSUANCE_TYPE: &str = "issuanceType";
    /// Asking price in the platform's fungible unit
    pub const PRICE: &str = "price";
    /// Free-form marketplace tags
    pub const TAGS: &str = "tags";
    /// Declared schema version, cross-checked by the validator
    pub const SCHEMA_VERSION: &str = "schemaVersion";
}

/// Marketplace category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Default bucket for anything without a clearer home
    #[default]
    Misc,
    Rpg,
    Adventure,
    Building,
    Puzzle,
    Social,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Misc => "misc",
            Self::Rpg => "rpg",
            Self::Adventure => "adventure",
            Self::Building => "building",
            Self::Puzzle => "puzzle",
            Self::Social => "social",
        }
    }

    /// Parse a category from a string, `None` for unknown tags
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "misc" => Some(Self::Misc),
            "rpg" => Some(Self::Rpg),
            "adventure" => Some(Self::Adventure),
            "building" => Some(Self::Building),
            "puzzle" => Some(Self::Puzzle),
            "social" => Some(Self::Social),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four orthogonal content facets of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// World geometry and structures
    Terrain,
    /// Actors, models, skins
    Character,
    /// Scripted behavior
    Logic,
    /// Input/response bindings
    Interaction,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Terrain => "terrain",
            Self::Character => "character",
            Self::Logic => "logic",
            Self::Interaction => "interaction",
        }
    }

    pub fn all() -> &'static [LayerKind] {
        &[
            Self::Terrain,
            Self::Character,
            Self::Logic,
            Self::Interaction,
        ]
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One content item within a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerItem {
    /// Path of the item inside its source container
    pub path: String,
    /// Item size in bytes
    pub size: u64,
    /// SHA-256 of the item content, when the parser could read it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

/// The four named, independently-defaulted layer sequences
///
/// Order within each sequence is caller-significant (layering/z-order) and
/// is never reordered or deduplicated by the system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleLayers {
    #[serde(default)]
    pub terrain: Vec<LayerItem>,
    #[serde(default)]
    pub character: Vec<LayerItem>,
    #[serde(default)]
    pub logic: Vec<LayerItem>,
    #[serde(default)]
    pub interaction: Vec<LayerItem>,
}

impl ModuleLayers {
    pub fn get(&self, kind: LayerKind) -> &[LayerItem] {
        match kind {
            LayerKind::Terrain => &self.terrain,
            LayerKind::Character => &self.character,
            LayerKind::Logic => &self.logic,
            LayerKind::Interaction => &self.interaction,
        }
    }

    /// Append an item to the given layer, preserving insertion order
    pub fn push(&mut self, kind: LayerKind, item: LayerItem) {
        match kind {
            LayerKind::Terrain => self.terrain.push(item),
            LayerKind::Character => self.character.push(item),
            LayerKind::Logic => self.logic.push(item),
            LayerKind::Interaction => self.interaction.push(item),
        }
    }

    pub fn item_count(&self) -> usize {
        self.terrain.len() + self.character.len() + self.logic.len() + self.interaction.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Construction fields for a module record
///
/// Unset optional fields take documented defaults. Construction never
/// validates: a half-formed record can be inspected and repaired before it
/// reaches the validation gate.
#[derive(Debug, Clone, Default)]
pub struct ModuleDraft {
    pub id: Option<String>,
    pub name: String,
    pub version: Option<String>,
    pub creator: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub layers: ModuleLayers,
    pub metadata: BTreeMap<String, Value>,
    pub created: Option<i64>,
    pub last_updated: Option<i64>,
}

/// A normalized, versioned content record
///
/// Field order here is the canonical field order of the interchange
/// document; the codec serializes fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleRecord {
    /// Opaque unique identifier, assigned once, immutable thereafter
    pub id: String,
    pub name: String,
    /// Semantic version string
    pub version: String,
    /// Wallet/account address of the creator
    pub creator: String,
    pub description: String,
    pub category: Category,
    pub layers: ModuleLayers,
    /// Open extension point: tags, issuance type, price, source markers
    pub metadata: BTreeMap<String, Value>,
    /// Epoch milliseconds, set once at construction
    pub created: i64,
    /// Epoch milliseconds, re-stamped by every record mutator
    pub last_updated: i64,
}

impl ModuleRecord {
    /// Construct a record from draft fields, applying defaults
    ///
    /// A missing `id` gets a fresh UUID v4; missing timestamps get the
    /// current time. Always succeeds syntactically; semantic checks belong
    /// to the validator.
    pub fn from_draft(draft: ModuleDraft) -> Self {
        let now = now_millis();
        Self {
            id: draft.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: draft.name,
            version: draft.version.unwrap_or_else(|| INITIAL_VERSION.to_string()),
            creator: draft.creator,
            description: draft.description.unwrap_or_default(),
            category: draft.category.unwrap_or_default(),
            layers: draft.layers,
            metadata: draft.metadata,
            created: draft.created.unwrap_or(now),
            last_updated: draft.last_updated.unwrap_or(now),
        }
    }

    /// Replace the creator identity and re-stamp `last_updated`
    pub fn set_creator(&mut self, creator: impl Into<String>) {
        self.creator = creator.into();
        self.touch();
    }

    /// Replace the category and re-stamp `last_updated`
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.touch();
    }

    /// Insert or replace a metadata entry and re-stamp `last_updated`
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
        self.touch();
    }

    /// Bump the minor version for a revised release
    ///
    /// The id stays unchanged; `last_updated` is re-stamped. A published
    /// record is otherwise immutable, so any post-publication change goes
    /// through this.
    pub fn bump_version(&mut self) -> crate::Result<()> {
        let mut version = semver::Version::parse(&self.version)?;
        version.minor += 1;
        version.patch = 0;
        version.pre = semver::Prerelease::EMPTY;
        version.build = semver::BuildMetadata::EMPTY;
        self.version = version.to_string();
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.last_updated = now_millis();
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
