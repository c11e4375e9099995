use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Absolute tolerance (in currency units) when checking the totals
/// invariant. Absorbs the rounding slack of printed receipt amounts.
pub const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 2); // 0.05

/// One purchased line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub id: String,
    /// Verbatim extracted line text — the dedup key half (with the store).
    pub raw_name: String,
    pub name: String,
    pub category: Category,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    /// Line total after the line-level discount.
    pub total_price: Decimal,
    pub discount: Decimal,
}

/// Reconciled receipt-level totals. The reconciler guarantees
/// `total = subtotal − discount` and `discount = discount_items +
/// discount_receipt`, each within [`TOTAL_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub discount_items: Decimal,
    pub discount_receipt: Decimal,
    pub total: Decimal,
    pub payment_method: Option<String>,
}

impl ReceiptTotals {
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        let closes = (self.total - (self.subtotal - self.discount)).abs() <= tolerance;
        let splits = (self.discount - (self.discount_items + self.discount_receipt)).abs()
            <= tolerance;
        closes && splits
    }
}

/// One purchase event — the system of record. Fully replaced on edit,
/// removed on delete; the product table is derived from these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    /// Ingestion timestamp.
    pub created_at: DateTime<Utc>,
    /// Business date; absent when the extraction carried no parseable date.
    pub purchased_at: Option<DateTime<Utc>>,
    pub store: String,
    pub currency: String,
    pub totals: ReceiptTotals,
    pub items: Vec<ReceiptItem>,
}

impl Receipt {
    /// The date this receipt counts under: the business date when known,
    /// the ingestion timestamp otherwise.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.purchased_at.unwrap_or(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn totals(subtotal: &str, discount: &str, items: &str, receipt: &str, total: &str) -> ReceiptTotals {
        ReceiptTotals {
            subtotal: dec(subtotal),
            discount: dec(discount),
            discount_items: dec(items),
            discount_receipt: dec(receipt),
            total: dec(total),
            payment_method: None,
        }
    }

    #[test]
    fn tolerance_constant_is_five_cents() {
        assert_eq!(TOTAL_TOLERANCE, dec("0.05"));
    }

    #[test]
    fn balanced_totals() {
        let t = totals("100", "10", "6", "4", "90");
        assert!(t.is_balanced(TOTAL_TOLERANCE));
    }

    #[test]
    fn balanced_within_tolerance() {
        let t = totals("100", "10", "10", "0", "90.04");
        assert!(t.is_balanced(TOTAL_TOLERANCE));
    }

    #[test]
    fn unbalanced_total() {
        let t = totals("100", "10", "10", "0", "95");
        assert!(!t.is_balanced(TOTAL_TOLERANCE));
    }

    #[test]
    fn unbalanced_discount_split() {
        let t = totals("100", "10", "3", "4", "90");
        assert!(!t.is_balanced(TOTAL_TOLERANCE));
    }

    #[test]
    fn effective_date_prefers_purchase_date() {
        let created = "2024-03-20T12:00:00Z".parse().unwrap();
        let purchased = "2024-03-15T00:00:00Z".parse().unwrap();
        let mut receipt = Receipt {
            id: "r1".into(),
            created_at: created,
            purchased_at: Some(purchased),
            store: "Billa".into(),
            currency: "CZK".into(),
            totals: totals("0", "0", "0", "0", "0"),
            items: vec![],
        };
        assert_eq!(receipt.effective_date(), purchased);

        receipt.purchased_at = None;
        assert_eq!(receipt.effective_date(), created);
    }

    #[test]
    fn serde_uses_camel_case_document_keys() {
        let t = totals("30", "2", "2", "0", "28");
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("discountItems").is_some());
        assert!(json.get("paymentMethod").is_some());
    }
}
