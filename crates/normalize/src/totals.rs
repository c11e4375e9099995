//! Totals reconciliation: derive a `ReceiptTotals` that satisfies
//! `total = subtotal − discount` and `discount = discount_items +
//! discount_receipt` from whatever evidence the extraction supplied.
//!
//! Evidence preference is fixed: explicit receipt-level totals, then sums
//! derived from the admitted items, then zero. The cascade never fails;
//! missing or invalid inputs coerce to zero.

use rust_decimal::Decimal;
use serde_json::Value;

use paragon_core::coerce::{safe_string, to_decimal};
use paragon_core::{ReceiptItem, ReceiptTotals, TOTAL_TOLERANCE};

fn field<'a>(totals: &'a Value, key: &str) -> &'a Value {
    totals.get(key).unwrap_or(&Value::Null)
}

pub fn reconcile_totals(items: &[ReceiptItem], raw_totals: &Value) -> ReceiptTotals {
    let items_total: Decimal = items.iter().map(|i| i.total_price).sum();
    let gross_total: Decimal = items.iter().map(|i| i.unit_price * i.quantity).sum();
    let item_discount_sum: Decimal = items.iter().map(|i| i.discount).sum();

    let discount_items_raw = to_decimal(field(raw_totals, "discount_items"), Decimal::ZERO);
    let discount_receipt_raw = to_decimal(field(raw_totals, "discount_receipt"), Decimal::ZERO);
    let discount_total_raw = to_decimal(field(raw_totals, "discount"), Decimal::ZERO);

    let discount_items = if discount_items_raw > Decimal::ZERO {
        discount_items_raw
    } else {
        item_discount_sum
    };

    let computed_subtotal = if gross_total > Decimal::ZERO { gross_total } else { items_total };

    // Residual needed to close the formula from item-level data alone.
    let computed_receipt_discount =
        (computed_subtotal - discount_items - items_total).max(Decimal::ZERO);

    let discount_receipt = if discount_receipt_raw > Decimal::ZERO {
        discount_receipt_raw
    } else {
        let from_total = (discount_total_raw - discount_items).max(Decimal::ZERO);
        if from_total > Decimal::ZERO { from_total } else { computed_receipt_discount }
    };

    let discount = if discount_total_raw > Decimal::ZERO {
        discount_total_raw
    } else {
        discount_items + discount_receipt
    };

    let subtotal_supplied = to_decimal(field(raw_totals, "subtotal"), Decimal::ZERO);
    let subtotal = if !subtotal_supplied.is_zero() {
        subtotal_supplied
    } else if !computed_subtotal.is_zero() {
        computed_subtotal
    } else {
        items_total
    };

    let computed_total = subtotal - discount;
    let total_supplied = to_decimal(field(raw_totals, "total"), Decimal::ZERO);
    let total = if total_supplied > Decimal::ZERO
        && (total_supplied - computed_total).abs() <= TOTAL_TOLERANCE
    {
        // Trust an OCR-reported total that agrees within rounding slack.
        total_supplied
    } else if computed_total > Decimal::ZERO {
        computed_total
    } else {
        items_total
    };

    let payment_method = {
        let s = safe_string(field(raw_totals, "payment_method"));
        if s.is_empty() { None } else { Some(s) }
    };

    ReceiptTotals { subtotal, discount, discount_items, discount_receipt, total, payment_method }
}
