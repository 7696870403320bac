// tests/pipeline_integration.rs

//! End-to-end tests for the module conversion pipeline
//!
//! These tests drive the orchestrator against recording fake collaborators,
//! covering the success path, failure tagging per stage, short-circuit
//! behavior (no collaborator calls after a gate failure), layer order
//! preservation, and content-address determinism.

mod common;

use common::{build_mod_archive, RecordingLedger, RecordingStorage, RPG_DESCRIPTOR};
use metaport::module::codec;
use metaport::{
    Config, ConversionPipeline, Error, PublishTerms, SourceFormatType, Stage, ValidationError,
};
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// TEST HELPERS
// =============================================================================

fn pipeline(
    config: &Config,
    storage: &Arc<RecordingStorage>,
    ledger: &Arc<RecordingLedger>,
) -> ConversionPipeline {
    ConversionPipeline::new(config, storage.clone(), ledger.clone())
}

fn rpg_archive() -> Vec<u8> {
    build_mod_archive(
        Some(RPG_DESCRIPTOR),
        &[("world/spawn.nbt", b"terrain data" as &[u8])],
    )
}

// =============================================================================
// SUCCESS PATH
// =============================================================================

#[tokio::test]
async fn test_small_archive_converts_end_to_end() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    let archive = rpg_archive();
    assert!(archive.len() < 2048);

    let receipt = pipeline(&config, &storage, &ledger)
        .run(&archive, None, &PublishTerms::paid("Wallet1", 15))
        .await
        .unwrap();

    assert!(!receipt.module_id.is_empty());
    assert!(!receipt.content_id.is_empty());
    assert!(!receipt.tx_reference.is_empty());

    assert_eq!(storage.upload_count(), 1);
    assert_eq!(ledger.submission_count(), 1);

    let (content_id, creator, price, free) =
        ledger.last_anchor.lock().unwrap().clone().unwrap();
    assert_eq!(content_id, receipt.content_id);
    assert_eq!(creator, "Wallet1");
    assert_eq!(price, 15);
    assert!(!free);
}

#[tokio::test]
async fn test_uploaded_document_reflects_parsed_module() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    pipeline(&config, &storage, &ledger)
        .run(
            &rpg_archive(),
            None,
            &PublishTerms::paid("Wallet1", 15).with_tags(vec!["rpg".to_string()]),
        )
        .await
        .unwrap();

    let document = storage.last_upload.lock().unwrap().clone().unwrap();
    let record = codec::decode(&document).unwrap();

    assert_eq!(record.name, "Test RPG");
    assert_eq!(record.creator, "Wallet1");
    assert_eq!(record.metadata["sourceFormat"], json!("blockgame"));
    assert_eq!(record.metadata["issuanceType"], json!("paid"));
    assert_eq!(record.metadata["price"], json!(15));
    assert_eq!(record.metadata["tags"], json!(["rpg"]));
    assert_eq!(record.metadata["schemaVersion"], json!("1.0.0"));
}

#[tokio::test]
async fn test_layer_order_preserved_end_to_end() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    let archive = build_mod_archive(
        Some(RPG_DESCRIPTOR),
        &[
            ("world/a.nbt", b"A" as &[u8]),
            ("world/b.nbt", b"B"),
            ("world/c.nbt", b"C"),
        ],
    );

    pipeline(&config, &storage, &ledger)
        .run(&archive, None, &PublishTerms::free("Wallet1"))
        .await
        .unwrap();

    let document = storage.last_upload.lock().unwrap().clone().unwrap();
    let record = codec::decode(&document).unwrap();
    let paths: Vec<&str> = record
        .layers
        .terrain
        .iter()
        .map(|i| i.path.as_str())
        .collect();
    assert_eq!(paths, vec!["world/a.nbt", "world/b.nbt", "world/c.nbt"]);
}

#[tokio::test]
async fn test_free_issuance_zeroes_the_anchor_price() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    pipeline(&config, &storage, &ledger)
        .run(&rpg_archive(), None, &PublishTerms::free("Wallet1"))
        .await
        .unwrap();

    let (_, _, price, free) = ledger.last_anchor.lock().unwrap().clone().unwrap();
    assert_eq!(price, 0);
    assert!(free);

    let document = storage.last_upload.lock().unwrap().clone().unwrap();
    let record = codec::decode(&document).unwrap();
    assert_eq!(record.metadata["issuanceType"], json!("free"));
}

#[tokio::test]
async fn test_same_prepared_module_addresses_identically() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();
    let pipeline = pipeline(&config, &storage, &ledger);

    let prepared = pipeline
        .prepare(&rpg_archive(), None, &PublishTerms::paid("Wallet1", 15))
        .unwrap();

    let first = pipeline.publish(&prepared).await.unwrap();
    let second = pipeline.publish(&prepared).await.unwrap();
    assert_eq!(first.content_id, second.content_id);
    assert_eq!(first.module_id, second.module_id);
}

#[tokio::test]
async fn test_explicit_format_selector() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    let receipt = pipeline(&config, &storage, &ledger)
        .run(
            &rpg_archive(),
            Some(SourceFormatType::BlockGame),
            &PublishTerms::paid("Wallet1", 15),
        )
        .await
        .unwrap();
    assert!(!receipt.module_id.is_empty());
}

// =============================================================================
// FAILURE TAGGING AND SHORT-CIRCUIT
// =============================================================================

#[tokio::test]
async fn test_unrecognized_bytes_fail_at_parsing() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    let err = pipeline(&config, &storage, &ledger)
        .run(b"definitely not an archive", None, &PublishTerms::free("Wallet1"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Parsing);
    assert!(!err.is_retryable());
    assert_eq!(storage.upload_count(), 0);
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn test_missing_creator_fails_at_validating() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    // Terms with an empty wallet leave the record's creator empty
    let err = pipeline(&config, &storage, &ledger)
        .run(&rpg_archive(), None, &PublishTerms::free(""))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Validating);
    assert!(matches!(
        err.error,
        Error::Validation(ValidationError::MissingField("creator"))
    ));
    assert!(!err.is_retryable());

    // The gate failed: no collaborator ever hears about this module
    assert_eq!(storage.upload_count(), 0);
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn test_oversized_module_fails_at_validating() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let mut config = Config::default();
    // Any real module document is bigger than this
    config.max_module_size_bytes = 64;

    let err = pipeline(&config, &storage, &ledger)
        .run(&rpg_archive(), None, &PublishTerms::free("Wallet1"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Validating);
    match err.error {
        Error::Validation(ValidationError::SizeExceeded { actual, limit }) => {
            assert!(actual > limit);
            assert_eq!(limit, 64);
        }
        other => panic!("expected SizeExceeded, got: {other}"),
    }

    assert_eq!(storage.upload_count(), 0);
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn test_storage_outage_fails_at_addressing() {
    let storage = Arc::new(RecordingStorage::failing());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();

    let err = pipeline(&config, &storage, &ledger)
        .run(&rpg_archive(), None, &PublishTerms::free("Wallet1"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Addressing);
    assert!(err.is_retryable());
    // Nothing gets anchored without a content identifier
    assert_eq!(ledger.submission_count(), 0);
}

#[tokio::test]
async fn test_ledger_outage_fails_at_anchoring() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::failing());
    let config = Config::default();

    let err = pipeline(&config, &storage, &ledger)
        .run(&rpg_archive(), None, &PublishTerms::free("Wallet1"))
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Anchoring);
    assert!(err.is_retryable());
    // The upload happened; the orphaned content is storage GC's concern
    assert_eq!(storage.upload_count(), 1);
}

// =============================================================================
// PARALLEL CONVERSIONS
// =============================================================================

#[tokio::test]
async fn test_independent_conversions_run_in_parallel() {
    let storage = Arc::new(RecordingStorage::new());
    let ledger = Arc::new(RecordingLedger::new());
    let config = Config::default();
    let pipeline = Arc::new(pipeline(&config, &storage, &ledger));

    let mut handles = Vec::new();
    for i in 0..4 {
        let pipeline = pipeline.clone();
        let archive = build_mod_archive(
            Some(RPG_DESCRIPTOR),
            &[("world/spawn.nbt", format!("terrain {i}").as_bytes())],
        );
        handles.push(tokio::spawn(async move {
            pipeline
                .run(&archive, None, &PublishTerms::paid("Wallet1", 5))
                .await
        }));
    }

    let mut module_ids = Vec::new();
    for handle in handles {
        let receipt = handle.await.unwrap().unwrap();
        module_ids.push(receipt.module_id);
    }

    module_ids.sort();
    module_ids.dedup();
    assert_eq!(module_ids.len(), 4);
    assert_eq!(storage.upload_count(), 4);
    assert_eq!(ledger.submission_count(), 4);
}
