//! Read-side projection of the receipt history into monthly and
//! per-category aggregates. Pure: no mutation, clock passed in.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use paragon_core::{Category, Receipt};

/// Month bucket for receipts without any usable date. Excluded from the
/// month listings but still counted in the running totals.
pub const UNKNOWN_MONTH: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSavings {
    pub month: String,
    pub saved: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_this_month: Decimal,
    pub saved_this_month: Decimal,
    pub saved_total: Decimal,
    /// `saved / (spent + saved)` for the current calendar month; 0 when
    /// nothing was spent or saved.
    pub savings_rate: Decimal,
    pub average_receipt: Decimal,
    pub largest_receipt: Decimal,
    pub monthly: Vec<MonthTotal>,
    pub monthly_savings: Vec<MonthSavings>,
    pub categories: Vec<CategoryTotal>,
    pub receipts_count: usize,
    pub items_count: usize,
}

/// `YYYY-MM` bucket key; `None` buckets under [`UNKNOWN_MONTH`].
pub fn month_key(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(d) => format!("{:04}-{:02}", d.year(), d.month()),
        None => UNKNOWN_MONTH.to_string(),
    }
}

pub fn compute_stats(receipts: &[Receipt], now: DateTime<Utc>) -> Stats {
    let mut monthly_map: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut savings_map: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut category_map: HashMap<Category, Decimal> =
        Category::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();

    let mut saved_total = Decimal::ZERO;
    let mut total_spent = Decimal::ZERO;
    let mut largest_receipt = Decimal::ZERO;
    let mut items_count = 0usize;

    for receipt in receipts {
        let key = month_key(Some(receipt.effective_date()));
        let spent = receipt.totals.total;
        let saved = receipt.totals.discount;

        *monthly_map.entry(key.clone()).or_default() += spent;
        *savings_map.entry(key).or_default() += saved;

        total_spent += spent;
        saved_total += saved;
        largest_receipt = largest_receipt.max(spent);
        items_count += receipt.items.len();

        for item in &receipt.items {
            *category_map.entry(item.category).or_default() += item.total_price;
        }
    }

    let monthly: Vec<MonthTotal> = monthly_map
        .iter()
        .filter(|(month, _)| month.as_str() != UNKNOWN_MONTH)
        .map(|(month, total)| MonthTotal { month: month.clone(), total: *total })
        .collect();
    let monthly_savings: Vec<MonthSavings> = monthly
        .iter()
        .map(|m| MonthSavings {
            month: m.month.clone(),
            saved: savings_map.get(&m.month).copied().unwrap_or_default(),
        })
        .collect();

    let categories: Vec<CategoryTotal> = Category::ALL
        .iter()
        .map(|c| CategoryTotal {
            category: *c,
            total: category_map.get(c).copied().unwrap_or_default(),
        })
        .collect();

    let current_key = month_key(Some(now));
    let total_this_month = monthly_map.get(&current_key).copied().unwrap_or_default();
    let saved_this_month = savings_map.get(&current_key).copied().unwrap_or_default();

    let denom = total_this_month + saved_this_month;
    let savings_rate =
        if denom > Decimal::ZERO { saved_this_month / denom } else { Decimal::ZERO };

    let receipts_count = receipts.len();
    let average_receipt = if receipts_count > 0 {
        total_spent / Decimal::from(receipts_count as u64)
    } else {
        Decimal::ZERO
    };

    Stats {
        total_this_month,
        saved_this_month,
        saved_total,
        savings_rate,
        average_receipt,
        largest_receipt,
        monthly,
        monthly_savings,
        categories,
        receipts_count,
        items_count,
    }
}
