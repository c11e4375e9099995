use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

use paragon_core::{new_id, Product, Receipt};
use paragon_normalize::Normalizer;
use paragon_storage::{SnapshotStore, StoreError};

use crate::ledger::{append, rebuild};
use crate::stats::{compute_stats, Stats};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Lookup miss on edit/delete — a signaled condition, not a failure of
    /// the pipeline; callers decide the user-visible behavior.
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the pipeline: raw payload → normalize → persist receipt →
/// update the product ledger → snapshot.
///
/// Every mutation is one atomic unit of read-snapshot, compute, and
/// write-snapshot — never a partial write. A single writer at a time is
/// assumed; concurrent mutation must be serialized by the caller.
pub struct ReceiptService<S: SnapshotStore> {
    store: S,
    normalizer: Normalizer,
}

impl<S: SnapshotStore> ReceiptService<S> {
    pub fn new(store: S) -> Self {
        Self::with_normalizer(store, Normalizer::default())
    }

    pub fn with_normalizer(store: S, normalizer: Normalizer) -> Self {
        Self { store, normalizer }
    }

    /// Ingest a raw extraction payload as a new receipt.
    pub fn add_receipt(&self, raw: &Value) -> Result<Receipt, ServiceError> {
        let normalized = self.normalizer.normalize(raw);
        let mut snapshot = self.store.read()?;

        let receipt = Receipt {
            id: new_id(),
            created_at: Utc::now(),
            purchased_at: normalized.purchased_at,
            store: normalized.store,
            currency: normalized.currency,
            totals: normalized.totals,
            items: normalized.items,
        };

        snapshot.products = append(&snapshot.products, &receipt);
        // Newest first, matching how the history is browsed.
        snapshot.receipts.insert(0, receipt.clone());
        self.store.write(&snapshot)?;

        tracing::info!(id = %receipt.id, store = %receipt.store, items = receipt.items.len(),
            "receipt ingested");
        Ok(receipt)
    }

    /// Re-normalize and replace an existing receipt's contents (identity
    /// and ingestion timestamp are preserved), then rebuild the product
    /// table — an edit may alter the price sequence later receipts'
    /// histories depended on.
    pub fn update_receipt(&self, id: &str, raw: &Value) -> Result<Receipt, ServiceError> {
        let normalized = self.normalizer.normalize(raw);
        let mut snapshot = self.store.read()?;

        let slot = snapshot
            .receipts
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::ReceiptNotFound(id.to_string()))?;

        slot.purchased_at = normalized.purchased_at;
        slot.store = normalized.store;
        slot.currency = normalized.currency;
        slot.totals = normalized.totals;
        slot.items = normalized.items;
        let updated = slot.clone();

        snapshot.products = rebuild(&snapshot.receipts, &snapshot.products);
        self.store.write(&snapshot)?;

        tracing::info!(id = %updated.id, "receipt updated, product ledger rebuilt");
        Ok(updated)
    }

    /// Remove a receipt and rebuild the product table. Returns `false`
    /// (without writing) when no receipt carried the id.
    pub fn delete_receipt(&self, id: &str) -> Result<bool, ServiceError> {
        let mut snapshot = self.store.read()?;
        let before = snapshot.receipts.len();
        snapshot.receipts.retain(|r| r.id != id);
        if snapshot.receipts.len() == before {
            return Ok(false);
        }

        snapshot.products = rebuild(&snapshot.receipts, &snapshot.products);
        self.store.write(&snapshot)?;

        tracing::info!(id, "receipt deleted, product ledger rebuilt");
        Ok(true)
    }

    pub fn receipts(&self) -> Result<Vec<Receipt>, ServiceError> {
        Ok(self.store.read()?.receipts)
    }

    pub fn receipt(&self, id: &str) -> Result<Option<Receipt>, ServiceError> {
        Ok(self.store.read()?.receipts.into_iter().find(|r| r.id == id))
    }

    pub fn products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.read()?.products)
    }

    pub fn product(&self, id: &str) -> Result<Option<Product>, ServiceError> {
        Ok(self.store.read()?.products.into_iter().find(|p| p.id == id))
    }

    pub fn stats(&self) -> Result<Stats, ServiceError> {
        Ok(compute_stats(&self.store.read()?.receipts, Utc::now()))
    }
}
