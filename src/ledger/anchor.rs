// src/ledger/anchor.rs

//! Ledger anchoring of addressed content

use crate::ledger::{LedgerClient, LedgerError};
use crate::storage::AddressedContent;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Commercial terms carried by an anchor record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorTerms {
    /// Creator's wallet/account address
    pub creator: String,
    /// Asking price in the platform's fungible unit
    pub price: u64,
    /// Offered at no cost; forces the effective price to zero
    pub free: bool,
}

impl AnchorTerms {
    pub fn paid(creator: impl Into<String>, price: u64) -> Self {
        Self {
            creator: creator.into(),
            price,
            free: false,
        }
    }

    pub fn free(creator: impl Into<String>) -> Self {
        Self {
            creator: creator.into(),
            price: 0,
            free: true,
        }
    }

    /// The price actually written on chain
    pub fn effective_price(&self) -> u64 {
        if self.free { 0 } else { self.price }
    }
}

/// Submits anchor records through the ledger collaborator
///
/// Taking `AddressedContent` (not an optional identifier) makes anchoring
/// unaddressed content unrepresentable.
pub struct LedgerAnchor {
    client: Arc<dyn LedgerClient>,
    timeout: Duration,
}

impl LedgerAnchor {
    pub fn new(client: Arc<dyn LedgerClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Anchor addressed content on the ledger, returning the transaction
    /// reference
    pub async fn anchor(
        &self,
        content: &AddressedContent,
        terms: &AnchorTerms,
    ) -> crate::Result<String> {
        let tx_reference = tokio::time::timeout(
            self.timeout,
            self.client.submit(
                &content.content_id,
                &terms.creator,
                terms.effective_price(),
                terms.free,
            ),
        )
        .await
        .map_err(|_| {
            LedgerError::Submission(format!(
                "submission timed out after {}s",
                self.timeout.as_secs()
            ))
        })??;

        info!(
            "Anchored {} for {} (price: {}, free: {}): {tx_reference}",
            content.content_id,
            terms.creator,
            terms.effective_price(),
            terms.free
        );
        Ok(tx_reference)
    }
}
