//! Free-Text Tolerance Parsing
//!
//! QC records store tolerances as typed by staff: `"± 0.3"`, `"0,5"`,
//! `"1,000"`, `"5%"`, `"+/- 0.2"`. Parsing never fails; anything that does
//! not yield a finite number becomes `+∞` ("no constraint"), never `0`.
//!
//! ## Normalization Steps
//!
//! ```text
//! "± 1,250.5 %"  → strip sign markers  → " 1,250.5 %"
//!                → drop whitespace     → "1,250.5%"
//!                → trailing % marker   → "1,250.5"   (percent = true)
//!                → separators          → "1250.5"
//!                → parse, |x|, /100    → 12.505
//! ```
//!
//! ### Separators
//! A comma is a thousands separator when a dot is also present or when the
//! number is grouped as thousands: a non-zero lead of one to three digits
//! followed by three-digit groups (`"1,000"`, `"12,345"`). Otherwise it is a
//! decimal comma (`"0,3"`, `"0,300"`), common in Indonesian-language records.
//!
//! ### Percent
//! A trailing `%` marks a percentage and the magnitude is scaled by 1/100
//! (`"30%"` → `0.3`). The record's separate unit column does not affect the
//! magnitude; it is only carried through for display.

use alloc::string::String;

use crate::traits::QcRecord;

use super::AcceptanceLimit;

/// Parse a free-text tolerance into an absolute magnitude
///
/// Returns `f64::INFINITY` for missing, empty or non-numeric input.
pub fn parse_tolerance(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return f64::INFINITY;
    };

    let mut text: String = raw
        .replace("+/-", "")
        .replace("+-", "")
        .chars()
        .filter(|c| *c != '±' && !c.is_whitespace())
        .collect();

    let mut percent = false;
    while text.ends_with('%') {
        text.pop();
        percent = true;
    }

    let normalized = normalize_separators(&text);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            let magnitude = libm::fabs(value);
            if percent {
                magnitude / 100.0
            } else {
                magnitude
            }
        }
        _ => f64::INFINITY,
    }
}

/// Build a dynamic limit from a QC record
pub fn limit_from_record(record: &QcRecord) -> AcceptanceLimit {
    AcceptanceLimit::dynamic(
        parse_tolerance(record.tolerance_raw.as_deref()),
        record.unit.trim(),
        record.instrument_name.as_str(),
    )
}

/// Resolve commas into either thousands separators (dropped) or a decimal point
fn normalize_separators(text: &str) -> String {
    if !text.contains(',') {
        return String::from(text);
    }

    let thousands = text.contains('.') || is_thousands_grouped(text);

    if thousands {
        text.chars().filter(|c| *c != ',').collect()
    } else {
        text.replace(',', ".")
    }
}

/// `1,000` or `12,345,678`: a non-zero lead of 1-3 digits, then 3-digit groups
fn is_thousands_grouped(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut groups = digits.split(',');
    let lead_ok = groups
        .next()
        .map(|lead| {
            (1..=3).contains(&lead.len())
                && !lead.starts_with('0')
                && lead.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false);
    lead_ok && groups.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}
