// src/ledger/mod.rs

//! Ledger collaborator
//!
//! Anchoring is the last pipeline stage: a minimal on-chain record tying
//! a content identifier to its creator and commercial terms. Signing and
//! RPC mechanics live behind the `LedgerClient` capability trait.

pub mod anchor;
pub mod client;

use thiserror::Error;

pub use anchor::{AnchorTerms, LedgerAnchor};
pub use client::{JsonRpcLedgerClient, LedgerClient};

#[derive(Error, Debug)]
pub enum LedgerError {
    /// RPC transport or signing failure while submitting the anchor
    #[error("chain submission failed: {0}")]
    Submission(String),
}
