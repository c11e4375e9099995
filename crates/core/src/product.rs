use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One observed unit price, tagged with the receipt it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub price: Decimal,
    pub receipt_id: String,
}

/// A deduplicated recurring purchase, keyed by `(store, raw_name)`.
///
/// Products are a fully-derived view over the receipt history: rebuilt
/// from scratch after any edit or delete, with ids carried over by key so
/// identity survives regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub store: String,
    pub raw_name: String,
    pub name: String,
    pub category: Category,
    pub unit: String,
    pub last_price: Decimal,
    /// Chronological distinct-price observations, append-only.
    pub price_history: Vec<PricePoint>,
}

impl Product {
    /// The dedup key. Exact string match by design — near-duplicate
    /// products from OCR transcription jitter are a known limitation.
    pub fn key(&self) -> (&str, &str) {
        (self.store.as_str(), self.raw_name.as_str())
    }
}
