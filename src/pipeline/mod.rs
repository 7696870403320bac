// src/pipeline/mod.rs

//! Conversion orchestrator
//!
//! Sequences the stages of a conversion run: parse, validate, serialize,
//! address, anchor. Transitions are strictly forward; the first failure
//! ends the run tagged with its stage, and the caller re-invokes from the
//! top with corrected input. The orchestrator holds no business logic of
//! its own.

use crate::config::Config;
use crate::error::Error;
use crate::formats::{self, SourceFormatType};
use crate::ledger::{AnchorTerms, LedgerAnchor, LedgerClient};
use crate::module::record::{meta, SCHEMA_VERSION};
use crate::module::{codec, ModuleRecord, Validator};
use crate::storage::{ContentAddresser, StorageClient};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parsing,
    Validating,
    Serializing,
    Addressing,
    Anchoring,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parsing => "parsing",
            Self::Validating => "validating",
            Self::Serializing => "serializing",
            Self::Addressing => "addressing",
            Self::Anchoring => "anchoring",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A conversion failure, tagged with the stage that produced it
#[derive(Debug)]
pub struct PipelineError {
    pub stage: Stage,
    pub error: Error,
}

impl PipelineError {
    /// Whether re-running the conversion from the top can succeed
    ///
    /// Collaborator stages fail on service conditions; everything earlier
    /// means the source input itself is bad.
    pub fn is_retryable(&self) -> bool {
        self.error.is_retryable()
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversion failed while {}: {}", self.stage, self.error)
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Publish terms applied to a parsed record before validation
#[derive(Debug, Clone)]
pub struct PublishTerms {
    /// Creator's wallet/account address, replacing the parser's placeholder
    pub creator: String,
    /// Asking price in the platform's fungible unit
    pub price: u64,
    /// Offered at no cost
    pub free: bool,
    /// Marketplace tags recorded in module metadata
    pub tags: Vec<String>,
}

impl PublishTerms {
    pub fn paid(creator: impl Into<String>, price: u64) -> Self {
        Self {
            creator: creator.into(),
            price,
            free: false,
            tags: Vec::new(),
        }
    }

    pub fn free(creator: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            price: 0,
            free: true,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    fn anchor_terms(&self) -> AnchorTerms {
        AnchorTerms {
            creator: self.creator.clone(),
            price: self.price,
            free: self.free,
        }
    }
}

/// A record that has passed the gate, with its canonical document
#[derive(Debug)]
pub struct PreparedModule {
    pub record: ModuleRecord,
    /// Canonical encoding of `record`; the bytes that get addressed
    pub document: Vec<u8>,
    terms: AnchorTerms,
}

/// Final result of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReceipt {
    pub module_id: String,
    pub content_id: String,
    pub tx_reference: String,
}

/// Sequences a conversion run across the pipeline stages
pub struct ConversionPipeline {
    validator: Validator,
    addresser: ContentAddresser,
    anchor: LedgerAnchor,
}

impl ConversionPipeline {
    pub fn new(
        config: &Config,
        storage: Arc<dyn StorageClient>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        Self {
            validator: Validator::new(config.validation()),
            addresser: ContentAddresser::new(storage, config.storage.timeout()),
            anchor: LedgerAnchor::new(ledger, config.ledger.timeout()),
        }
    }

    /// Run the offline stages: parse, apply terms, validate, serialize
    pub fn prepare(
        &self,
        bytes: &[u8],
        format: Option<SourceFormatType>,
        terms: &PublishTerms,
    ) -> Result<PreparedModule, PipelineError> {
        info!("Conversion started: {} input bytes", bytes.len());

        let (format, mut record) =
            formats::parse_module(bytes, format).map_err(|e| fail(Stage::Parsing, e))?;
        info!("Parsed {} archive as module \"{}\"", format, record.name);

        apply_terms(&mut record, format, terms);

        self.validator
            .validate(&record)
            .map_err(|e| fail(Stage::Validating, e))?;
        info!("Module {} passed validation", record.id);

        let document = codec::encode(&record).map_err(|e| fail(Stage::Serializing, e))?;

        Ok(PreparedModule {
            record,
            document,
            terms: terms.anchor_terms(),
        })
    }

    /// Run the collaborator stages: address, anchor
    pub async fn publish(
        &self,
        prepared: &PreparedModule,
    ) -> Result<ConversionReceipt, PipelineError> {
        let addressed = self
            .addresser
            .address(&prepared.document)
            .await
            .map_err(|e| fail(Stage::Addressing, e))?;

        let tx_reference = self
            .anchor
            .anchor(&addressed, &prepared.terms)
            .await
            .map_err(|e| fail(Stage::Anchoring, e))?;

        info!(
            "Conversion done: module {} anchored as {tx_reference}",
            prepared.record.id
        );
        Ok(ConversionReceipt {
            module_id: prepared.record.id.clone(),
            content_id: addressed.content_id,
            tx_reference,
        })
    }

    /// Full conversion: raw bytes to anchored module
    pub async fn run(
        &self,
        bytes: &[u8],
        format: Option<SourceFormatType>,
        terms: &PublishTerms,
    ) -> Result<ConversionReceipt, PipelineError> {
        let prepared = self.prepare(bytes, format, terms)?;
        self.publish(&prepared).await
    }
}

fn fail(stage: Stage, error: impl Into<Error>) -> PipelineError {
    PipelineError {
        stage,
        error: error.into(),
    }
}

/// Stamp the publish terms onto a freshly parsed record
///
/// This is the one mutation window in a record's life: after it, the record
/// is gated, encoded, and treated as immutable.
fn apply_terms(record: &mut ModuleRecord, format: SourceFormatType, terms: &PublishTerms) {
    record.set_creator(&terms.creator);
    record.insert_metadata(meta::SOURCE_FORMAT, json!(format.name()));
    record.insert_metadata(
        meta::ISSUANCE_TYPE,
        json!(if terms.free { "free" } else { "paid" }),
    );
    record.insert_metadata(meta::PRICE, json!(terms.price));
    record.insert_metadata(meta::SCHEMA_VERSION, json!(SCHEMA_VERSION));
    if !terms.tags.is_empty() {
        record.insert_metadata(meta::TAGS, json!(terms.tags));
    }
}
