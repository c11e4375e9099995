use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use paragon_core::coerce::{parse_date, safe_string, to_decimal};
use paragon_core::{new_id, ReceiptItem, ReceiptTotals};

use crate::classify::LineClassifier;
use crate::totals::reconcile_totals;
use crate::units::normalize_unit;

const FALLBACK_STORE: &str = "Unknown store";
const FALLBACK_CURRENCY: &str = "CZK";
const FALLBACK_ITEM_NAME: &str = "Unknown item";

/// The Normalizer's output: a typed, internally-consistent receipt with no
/// identity or ingestion timestamp yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReceipt {
    pub store: String,
    pub currency: String,
    /// `None` when the extraction carried no parseable purchase date.
    pub purchased_at: Option<DateTime<Utc>>,
    pub totals: ReceiptTotals,
    pub items: Vec<ReceiptItem>,
}

/// Turns an arbitrarily-shaped extraction payload into a
/// [`NormalizedReceipt`]. Every field is treated as optional and
/// untrusted; normalization always produces a structurally valid result
/// and never fails.
pub struct Normalizer {
    classifier: LineClassifier,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(LineClassifier::default())
    }
}

impl Normalizer {
    pub fn new(classifier: LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn normalize(&self, raw: &Value) -> NormalizedReceipt {
        let store = non_empty_or(
            safe_string(raw.pointer("/store/name").unwrap_or(&Value::Null)),
            FALLBACK_STORE,
        );
        let currency = non_empty_or(
            safe_string(raw.get("currency").unwrap_or(&Value::Null)),
            FALLBACK_CURRENCY,
        );
        let purchased_at = parse_date(raw.get("purchased_at").unwrap_or(&Value::Null));

        let items: Vec<ReceiptItem> = raw
            .get("items")
            .and_then(Value::as_array)
            .map(|lines| lines.iter().filter_map(|line| self.admit_item(line)).collect())
            .unwrap_or_default();

        let totals = reconcile_totals(&items, raw.get("totals").unwrap_or(&Value::Null));

        NormalizedReceipt { store, currency, purchased_at, totals, items }
    }

    /// Apply the item admission algorithm to one candidate line. Returns
    /// `None` for lines that carry no name, look like service noise, or
    /// have no usable price signal.
    fn admit_item(&self, line: &Value) -> Option<ReceiptItem> {
        let raw_name_field = safe_string(line.get("raw_name").unwrap_or(&Value::Null));
        let name_field = safe_string(line.get("name").unwrap_or(&Value::Null));

        let raw_name = if !raw_name_field.is_empty() { raw_name_field } else { name_field.clone() };
        let name = if !name_field.is_empty() {
            name_field
        } else if !raw_name.is_empty() {
            raw_name.clone()
        } else {
            FALLBACK_ITEM_NAME.to_string()
        };
        if raw_name.is_empty() && name == FALLBACK_ITEM_NAME {
            return None;
        }

        let combined = format!("{raw_name} {name}");
        if self.classifier.is_non_product(combined.trim()) {
            tracing::debug!(line = %raw_name, "dropped non-product line");
            return None;
        }

        let quantity = {
            let q = to_decimal(line.get("quantity").unwrap_or(&Value::Null), Decimal::ONE);
            if q > Decimal::ZERO { q } else { Decimal::ONE }
        };
        let unit_price = to_decimal(line.get("unit_price").unwrap_or(&Value::Null), Decimal::ZERO);
        let discount = to_decimal(line.get("discount").unwrap_or(&Value::Null), Decimal::ZERO);

        let total_price = {
            let parsed =
                to_decimal(line.get("total_price").unwrap_or(&Value::Null), Decimal::ZERO);
            if parsed.is_zero() {
                (unit_price * quantity - discount).max(Decimal::ZERO)
            } else {
                parsed
            }
        };

        if unit_price <= Decimal::ZERO && total_price <= Decimal::ZERO {
            tracing::debug!(line = %raw_name, "dropped line without price signal");
            return None;
        }

        let unit = normalize_unit(&safe_string(line.get("unit").unwrap_or(&Value::Null)));
        let supplied_category = safe_string(line.get("category").unwrap_or(&Value::Null));
        let category = self.classifier.resolve_category(&supplied_category, &name);

        Some(ReceiptItem {
            id: new_id(),
            raw_name,
            name,
            category,
            quantity,
            unit,
            unit_price,
            total_price,
            discount,
        })
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() { fallback.to_string() } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paragon_core::{Category, TOTAL_TOLERANCE};
    use serde_json::json;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn normalize(raw: Value) -> NormalizedReceipt {
        Normalizer::default().normalize(&raw)
    }

    #[test]
    fn empty_payload_yields_fallbacks() {
        let r = normalize(json!(null));
        assert_eq!(r.store, "Unknown store");
        assert_eq!(r.currency, "CZK");
        assert_eq!(r.purchased_at, None);
        assert!(r.items.is_empty());
        assert!(r.totals.is_balanced(TOTAL_TOLERANCE));
    }

    #[test]
    fn store_and_currency_are_extracted() {
        let r = normalize(json!({
            "store": { "name": "  Billa  " },
            "currency": "EUR",
            "purchased_at": "2024-03-15"
        }));
        assert_eq!(r.store, "Billa");
        assert_eq!(r.currency, "EUR");
        assert_eq!(r.purchased_at.unwrap().to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn unparseable_purchase_date_is_none() {
        let r = normalize(json!({ "purchased_at": "soon" }));
        assert_eq!(r.purchased_at, None);
    }

    #[test]
    fn admits_a_plain_item() {
        let r = normalize(json!({ "items": [
            { "raw_name": "MLEKO 1L", "name": "Milk", "quantity": 2, "unit": "l",
              "unit_price": 25.5, "total_price": 51.0 }
        ]}));
        assert_eq!(r.items.len(), 1);
        let item = &r.items[0];
        assert_eq!(item.raw_name, "MLEKO 1L");
        assert_eq!(item.name, "Milk");
        assert_eq!(item.unit, "l");
        assert_eq!(item.quantity, dec("2"));
        assert_eq!(item.category, Category::Grocery);
    }

    #[test]
    fn card_line_is_always_dropped() {
        let r = normalize(json!({ "items": [
            { "raw_name": "VISA **** 1234  0.00", "unit_price": 100, "total_price": 100 }
        ]}));
        assert!(r.items.is_empty());
    }

    #[test]
    fn nameless_line_is_dropped() {
        let r = normalize(json!({ "items": [
            { "unit_price": 10, "total_price": 10 }
        ]}));
        assert!(r.items.is_empty());
    }

    #[test]
    fn priceless_line_is_dropped() {
        let r = normalize(json!({ "items": [
            { "raw_name": "Mystery thing", "unit_price": 0, "total_price": 0 }
        ]}));
        assert!(r.items.is_empty());
    }

    #[test]
    fn name_falls_back_to_raw_name_and_vice_versa() {
        let r = normalize(json!({ "items": [
            { "raw_name": "CHLEB KONZUMNI", "unit_price": 32 },
            { "name": "Butter", "unit_price": 55 }
        ]}));
        assert_eq!(r.items[0].name, "CHLEB KONZUMNI");
        assert_eq!(r.items[1].raw_name, "Butter");
    }

    #[test]
    fn quantity_is_forced_positive() {
        let r = normalize(json!({ "items": [
            { "raw_name": "Eggs", "quantity": -2, "unit_price": 5 },
            { "raw_name": "Flour", "quantity": 0, "unit_price": 20 }
        ]}));
        assert_eq!(r.items[0].quantity, Decimal::ONE);
        assert_eq!(r.items[1].quantity, Decimal::ONE);
    }

    #[test]
    fn missing_unit_defaults_to_pcs() {
        let r = normalize(json!({ "items": [ { "raw_name": "Zarovka", "unit_price": 45 } ]}));
        assert_eq!(r.items[0].unit, "pcs");
    }

    #[test]
    fn total_price_backfills_from_unit_price_quantity_and_discount() {
        let r = normalize(json!({ "items": [
            { "raw_name": "Juice", "unit_price": 10, "quantity": 3, "discount": 2 }
        ]}));
        assert_eq!(r.items[0].total_price, dec("28"));

        let t = &r.totals;
        assert_eq!(t.subtotal, dec("30"));
        assert_eq!(t.discount_items, dec("2"));
        assert_eq!(t.discount_receipt, dec("0"));
        assert_eq!(t.discount, dec("2"));
        assert_eq!(t.total, dec("28"));
        assert!(t.is_balanced(TOTAL_TOLERANCE));
    }

    #[test]
    fn supplied_category_outside_enum_is_inferred() {
        let r = normalize(json!({ "items": [
            { "raw_name": "Shampoo", "category": "cosmetics", "unit_price": 80 }
        ]}));
        assert_eq!(r.items[0].category, Category::Household);
    }

    #[test]
    fn supplied_valid_category_is_kept() {
        let r = normalize(json!({ "items": [
            { "raw_name": "Milk", "category": "household", "unit_price": 25 }
        ]}));
        assert_eq!(r.items[0].category, Category::Household);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let r = normalize(json!({ "items": [
            { "raw_name": "Cheese", "quantity": "2", "unit_price": "45,90" }
        ]}));
        assert_eq!(r.items[0].unit_price, dec("45.90"));
        assert_eq!(r.items[0].total_price, dec("91.80"));
    }

    #[test]
    fn items_field_of_wrong_type_is_ignored() {
        let r = normalize(json!({ "items": "nope" }));
        assert!(r.items.is_empty());
        let r = normalize(json!({ "items": { "raw_name": "x" } }));
        assert!(r.items.is_empty());
    }

    #[test]
    fn totals_invariant_holds_for_messy_receipt() {
        let r = normalize(json!({
            "store": { "name": "Albert" },
            "items": [
                { "raw_name": "MLEKO", "unit_price": "25,90", "quantity": 1 },
                { "raw_name": "ROHLIK", "unit_price": 3, "quantity": 10, "discount": 5 },
                { "raw_name": "VISA PAYMENT", "unit_price": 0, "total_price": "55.90" }
            ],
            "totals": { "total": "50,90" }
        }));
        assert_eq!(r.items.len(), 2);
        assert!(r.totals.is_balanced(TOTAL_TOLERANCE));
        assert_eq!(r.totals.total, dec("50.90"));
    }
}
