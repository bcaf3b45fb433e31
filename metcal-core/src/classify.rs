//! QC Classification of Paired Readings
//!
//! ## Correction
//!
//! ```text
//! correction = standard − UUT
//! ```
//!
//! Positive means the standard reads higher than the unit under test, i.e.
//! the UUT reading has to be *raised* by the correction. The reported value
//! is rounded to [`CORRECTION_DECIMALS`] places; the verdict is always made
//! on the unrounded difference, so coarse display precision cannot pull an
//! out-of-tolerance reading back inside its limit.
//!
//! ## Verdict
//!
//! ```text
//! passed = |correction| <= limit + ε      (ε = 1e-6)
//! ```
//!
//! The epsilon absorbs binary rounding right at the limit: 20.3 − 20.2 is
//! 0.10000000000000142 in f64 and must still pass a 0.1 °C limit.
//!
//! ## Totality
//!
//! Classification never panics. A NaN or infinite reading on either side
//! produces `correction = NaN` and `passed = false`; import validation is
//! expected to reject such rows upstream, but nothing here relies on it.

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::constants::qc::{CORRECTION_DECIMALS, QC_EPSILON};
use crate::limits::AcceptanceLimit;

/// Result of classifying one standard/UUT pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcEvaluation {
    /// `standard − uut`, rounded for display; NaN for malformed input
    pub correction: f64,
    /// Whether |correction| is within the limit
    pub passed: bool,
    /// Limit the verdict was made against
    pub limit_used: AcceptanceLimit,
}

impl QcEvaluation {
    /// Limit as printed in reports (`"± 0.1 °C"` or `"N/A"`)
    pub fn limit_display(&self) -> String {
        self.limit_used.display()
    }

    /// False when the correction could not be computed
    pub fn is_valid(&self) -> bool {
        self.correction.is_finite()
    }
}

/// Classifier with configurable tolerance and precision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QcClassifier {
    epsilon: f64,
    decimals: u32,
}

impl Default for QcClassifier {
    fn default() -> Self {
        Self {
            epsilon: QC_EPSILON,
            decimals: CORRECTION_DECIMALS,
        }
    }
}

impl QcClassifier {
    /// Create a classifier; a negative or non-finite epsilon falls back to the default
    pub fn new(epsilon: f64, decimals: u32) -> Self {
        let epsilon = if epsilon.is_finite() && epsilon >= 0.0 {
            epsilon
        } else {
            QC_EPSILON
        };
        Self { epsilon, decimals }
    }

    /// Comparison tolerance
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Decimal places kept on corrections
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Classify a reading pair against a resolved limit
    pub fn classify(&self, standard: f64, uut: f64, limit: &AcceptanceLimit) -> QcEvaluation {
        let raw = if standard.is_finite() && uut.is_finite() {
            standard - uut
        } else {
            f64::NAN
        };

        QcEvaluation {
            correction: round_to(raw, self.decimals),
            passed: limit.permits(raw, self.epsilon),
            limit_used: limit.clone(),
        }
    }

    /// Classify when the limit may be missing; `None` reports as "N/A"
    pub fn classify_optional(
        &self,
        standard: f64,
        uut: f64,
        limit: Option<&AcceptanceLimit>,
    ) -> QcEvaluation {
        match limit {
            Some(limit) => self.classify(standard, uut, limit),
            None => self.classify(standard, uut, &AcceptanceLimit::unresolved()),
        }
    }
}

/// Classify with the default epsilon and precision
pub fn classify(standard: f64, uut: f64, limit: &AcceptanceLimit) -> QcEvaluation {
    QcClassifier::default().classify(standard, uut, limit)
}

/// Round half away from zero to `decimals` places
///
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = libm::pow(10.0, decimals as f64);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    libm::round(scaled) / factor
}
