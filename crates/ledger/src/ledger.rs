//! The product ledger: a deduplicated table of recurring purchases, each
//! carrying a chronological history of distinct observed unit prices.
//!
//! Both operations are pure functions of (receipt history, product table):
//! `append` is the O(new items) fast path on ingestion; `rebuild` replays
//! the whole history and is the only way to restore consistency after a
//! receipt is edited or deleted retroactively.

use std::collections::HashMap;

use rust_decimal::Decimal;

use paragon_core::{new_id, Category, PricePoint, Product, Receipt, ReceiptItem};

/// Fold one new receipt into the product table.
///
/// Products are matched by exact `(store, raw_name)` — deliberately no
/// fuzzy matching, so OCR transcription jitter can fragment the table
/// (documented limitation). A first sighting seeds the product with the
/// item's price as both `last_price` and the sole history point; repeat
/// sightings append a point only when the price is positive and actually
/// changed.
pub fn append(products: &[Product], receipt: &Receipt) -> Vec<Product> {
    let mut updated = products.to_vec();
    for item in &receipt.items {
        let found = updated
            .iter_mut()
            .find(|p| p.store == receipt.store && p.raw_name == item.raw_name);
        match found {
            Some(product) => observe(product, receipt, item),
            None => updated.push(seed(new_id(), receipt, item)),
        }
    }
    updated
}

/// Recompute the whole product table by replaying every receipt in
/// chronological order (purchase date, ingestion timestamp as fallback).
///
/// Ids are carried over from `previous` for every `(store, raw_name)` key
/// that survives, so product identity is stable across rebuilds even
/// though the objects are regenerated. Rebuilding twice from the same
/// receipt set yields an identical table.
pub fn rebuild(receipts: &[Receipt], previous: &[Product]) -> Vec<Product> {
    let prior_ids: HashMap<(&str, &str), &str> =
        previous.iter().map(|p| (p.key(), p.id.as_str())).collect();

    let mut ordered: Vec<&Receipt> = receipts.iter().collect();
    // Stable sort: same-instant receipts keep their snapshot order.
    ordered.sort_by_key(|r| r.effective_date());

    let mut table: Vec<Product> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for receipt in ordered {
        for item in &receipt.items {
            let key = (receipt.store.clone(), item.raw_name.clone());
            match index.get(&key) {
                Some(&at) => observe(&mut table[at], receipt, item),
                None => {
                    let id = prior_ids
                        .get(&(receipt.store.as_str(), item.raw_name.as_str()))
                        .map(|id| (*id).to_string())
                        .unwrap_or_else(new_id);
                    index.insert(key, table.len());
                    table.push(seed(id, receipt, item));
                }
            }
        }
    }

    table
}

fn price_point(receipt: &Receipt, item: &ReceiptItem) -> PricePoint {
    PricePoint {
        date: receipt.effective_date(),
        price: item.unit_price,
        receipt_id: receipt.id.clone(),
    }
}

fn seed(id: String, receipt: &Receipt, item: &ReceiptItem) -> Product {
    Product {
        id,
        store: receipt.store.clone(),
        raw_name: item.raw_name.clone(),
        name: item.name.clone(),
        category: item.category,
        unit: item.unit.clone(),
        last_price: item.unit_price,
        price_history: vec![price_point(receipt, item)],
    }
}

/// Fold a repeat sighting into an existing product: record a price point
/// only for a positive, changed price (price stability must not grow the
/// history), backfill name/unit when previously empty, and promote the
/// category away from `other` when the item carries a more specific one.
fn observe(product: &mut Product, receipt: &Receipt, item: &ReceiptItem) {
    if item.unit_price > Decimal::ZERO && item.unit_price != product.last_price {
        product.price_history.push(price_point(receipt, item));
        product.last_price = item.unit_price;
    }
    if product.name.is_empty() {
        product.name = item.name.clone();
    }
    if product.unit.is_empty() {
        product.unit = item.unit.clone();
    }
    if product.category == Category::Other {
        product.category = item.category;
    }
}
