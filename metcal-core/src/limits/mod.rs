//! Acceptance Limit Resolution
//!
//! ## Overview
//!
//! A calibration reading passes QC when the absolute correction
//! (`standard − UUT`) stays within an acceptance limit. This module decides
//! what that limit is. Two strategies exist and the caller picks one per use
//! case; they are never merged:
//!
//! ### 1. Fixed WMO Rule Table ([`fixed`])
//! A pure function of the sensor's physical quantity and the reference
//! (standard) reading:
//!
//! ```text
//! Quantity        | Limit
//! ----------------|-------------------------------------------
//! Temperature     | 0.1 °C
//! Pressure        | 0.1 hPa
//! Humidity        | 3 %RH if ref > 50, else 5 %RH
//! Wind speed      | 0.5 m/s if ref <= 5, else 10% of ref
//! Wind direction  | 5°
//! Rainfall        | 5% of ref
//! Unknown         | +∞ (unresolved)
//! ```
//!
//! ### 2. Dynamic Per-Instrument Lookup ([`dynamic`])
//! A "master QC" record fetched from the instrument registry carries a
//! free-text tolerance ("± 0.3", "5%"). The text is parsed by [`tolerance`]
//! and the result is memoized per sensor id.
//!
//! ## Sentinels
//!
//! A limit is never negative and never silently zero. Anything that cannot
//! be resolved becomes `+∞`, which always passes, and carries
//! [`LimitKind::Unresolved`] so reports can print "N/A" instead of a number.
//! An explicitly infinite limit (unparseable tolerance on an existing QC
//! record) keeps its own kind and prints as "± ∞".

pub mod fixed;
pub mod tolerance;

#[cfg(feature = "std")]
pub mod dynamic;

pub use fixed::resolve_fixed_limit;
pub use tolerance::{parse_tolerance, limit_from_record};

#[cfg(feature = "std")]
pub use dynamic::{DynamicLimitResolver, DynamicResolution};

use alloc::format;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::constants::qc::{NOT_AVAILABLE_LABEL, UNRESOLVED_SOURCE_LABEL};

/// Where a limit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    /// Fixed WMO rule table
    Fixed,
    /// Per-instrument QC record
    Dynamic,
    /// Nothing could be resolved (unknown quantity or no QC record)
    Unresolved,
}

/// Resolved acceptance tolerance for |correction|
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceLimit {
    /// Absolute bound, `>= 0`; `+∞` always passes
    pub value: f64,
    /// Display unit, may be empty
    pub unit: String,
    /// Human-readable provenance
    pub source_label: String,
    /// Resolution strategy that produced the limit
    pub kind: LimitKind,
}

impl AcceptanceLimit {
    /// Limit from the fixed rule table
    pub fn fixed(value: f64, unit: &str, source_label: &str) -> Self {
        Self {
            value: sanitize(value),
            unit: unit.to_string(),
            source_label: source_label.to_string(),
            kind: LimitKind::Fixed,
        }
    }

    /// Limit from a per-instrument QC record
    pub fn dynamic(value: f64, unit: impl Into<String>, source_label: impl Into<String>) -> Self {
        Self {
            value: sanitize(value),
            unit: unit.into(),
            source_label: source_label.into(),
            kind: LimitKind::Dynamic,
        }
    }

    /// The "no limit known" sentinel
    pub fn unresolved() -> Self {
        Self {
            value: f64::INFINITY,
            unit: String::new(),
            source_label: UNRESOLVED_SOURCE_LABEL.to_string(),
            kind: LimitKind::Unresolved,
        }
    }

    /// True when nothing could be resolved
    pub fn is_unresolved(&self) -> bool {
        self.kind == LimitKind::Unresolved
    }

    /// True for any infinite bound, resolved or not
    pub fn is_unbounded(&self) -> bool {
        self.value.is_infinite()
    }

    /// Whether an absolute correction is inside the limit, with float tolerance
    pub fn permits(&self, correction: f64, epsilon: f64) -> bool {
        correction.is_finite() && libm::fabs(correction) <= self.value + epsilon
    }

    /// Report string: `"± 0.1 °C"`, `"± ∞ %RH"` or `"N/A"`
    pub fn display(&self) -> String {
        if self.is_unresolved() {
            return NOT_AVAILABLE_LABEL.to_string();
        }

        let magnitude = if self.value.is_infinite() {
            "∞".to_string()
        } else {
            format_number(self.value)
        };
        let text = format!("± {} {}", magnitude, self.unit.trim());
        collapse_plus_minus(text.trim_end())
    }
}

/// Enforce the limit invariant: NaN is unresolvable, sign is dropped
fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        libm::fabs(value)
    }
}

/// Up to six decimals without trailing zeros: 3 → "3", 0.50001 → "0.50001"
fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// "±±" and "± ±" collapse to a single sign (units sometimes carry their own)
fn collapse_plus_minus(text: &str) -> String {
    let mut out = text.to_string();
    while out.contains("±±") || out.contains("± ±") {
        out = out.replace("± ±", "±").replace("±±", "±");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_enforce_non_negative() {
        assert_eq!(AcceptanceLimit::fixed(-0.1, "°C", "rule").value, 0.1);
        assert_eq!(AcceptanceLimit::dynamic(f64::NAN, "", "x").value, f64::INFINITY);
    }

    #[test]
    fn display_formats() {
        assert_eq!(AcceptanceLimit::fixed(0.1, "°C", "r").display(), "± 0.1 °C");
        assert_eq!(AcceptanceLimit::fixed(3.0, "%RH", "r").display(), "± 3 %RH");
        assert_eq!(AcceptanceLimit::fixed(0.50001, "m/s", "r").display(), "± 0.50001 m/s");
        assert_eq!(AcceptanceLimit::dynamic(0.3, "", "Barometer").display(), "± 0.3");
    }

    #[test]
    fn display_infinite_and_unresolved() {
        assert_eq!(AcceptanceLimit::dynamic(f64::INFINITY, "hPa", "B").display(), "± ∞ hPa");
        assert_eq!(AcceptanceLimit::unresolved().display(), "N/A");
    }

    #[test]
    fn display_collapses_double_sign() {
        let limit = AcceptanceLimit::dynamic(0.2, "±°C", "T");
        assert_eq!(limit.display(), "± 0.2 ±°C");
        assert_eq!(collapse_plus_minus("±± 0.2 °C"), "± 0.2 °C");
        assert_eq!(collapse_plus_minus("± ± 0.2"), "± 0.2");
    }

    #[test]
    fn permits_uses_epsilon() {
        let limit = AcceptanceLimit::fixed(0.1, "°C", "r");
        assert!(limit.permits(0.1000001, 1e-6));
        assert!(limit.permits(-0.1, 1e-6));
        assert!(!limit.permits(0.11, 1e-6));
        assert!(!limit.permits(f64::NAN, 1e-6));
    }

    #[test]
    fn unresolved_permits_any_finite() {
        let limit = AcceptanceLimit::unresolved();
        assert!(limit.permits(1e12, 0.0));
        assert!(!limit.permits(f64::INFINITY, 0.0));
    }
}
