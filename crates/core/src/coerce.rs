//! Tolerant scalar coercion for untrusted extraction payloads.
//!
//! Every function here accepts any `serde_json::Value`, never panics, and
//! falls back to a caller-supplied default (or `None`) when the input
//! carries no usable signal.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

fn re_dmy() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(\d{2})[./-](\d{2})[./-](\d{4})").expect("invalid regex"))
}

/// Coerce an untyped value into a `Decimal`.
///
/// Numbers pass through losslessly. Strings are stripped down to digits,
/// separators, and a sign; the rightmost `.` or `,` is taken as the decimal
/// separator and all other separators dropped, which tolerates both
/// `1,234.56` and `1.234,56` as well as bare `25,50`. Anything that still
/// fails to parse yields `fallback`.
pub fn to_decimal(value: &Value, fallback: Decimal) -> Decimal {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain))
            .unwrap_or(fallback),
        Value::String(s) => parse_decimal_str(s).unwrap_or(fallback),
        _ => fallback,
    }
}

fn parse_decimal_str(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    // Rightmost separator wins as the decimal point; the rest are assumed
    // to be thousands separators.
    let decimal_pos = cleaned.rfind(['.', ',']);
    let normalized: String = cleaned
        .char_indices()
        .filter_map(|(i, c)| match c {
            '.' | ',' if Some(i) == decimal_pos => Some('.'),
            '.' | ',' => None,
            other => Some(other),
        })
        .collect();

    Decimal::from_str(&normalized).ok()
}

/// Parse an untyped value into a UTC instant, or `None`.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD[THH:MM:SS]`, and the
/// `DD[./-]MM[./-]YYYY` forms seen on printed receipts (reconstructed at
/// midnight UTC). Never panics.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let trimmed = value.as_str()?.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
    }

    let c = re_dmy().captures(trimmed)?;
    let day: u32 = c.get(1)?.as_str().parse().ok()?;
    let month: u32 = c.get(2)?.as_str().parse().ok()?;
    let year: i32 = c.get(3)?.as_str().parse().ok()?;
    let d = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(d.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Coerce an untyped value into a string: strings are trimmed, numbers are
/// stringified, anything else becomes empty.
pub fn safe_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
