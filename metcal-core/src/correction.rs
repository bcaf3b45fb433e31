//! Standard-Instrument Correction Interpolation
//!
//! ## Background
//!
//! A reference-grade (standard) instrument is itself calibrated at a handful
//! of setpoints, and its certificate publishes a correction and an expanded
//! uncertainty for each:
//!
//! ```text
//! setpoint | correction | uncertainty
//! ---------|------------|------------
//!   0.0    |   +0.02    |   0.05
//!  20.0    |   -0.01    |   0.05
//!  40.0    |   -0.04    |   0.06
//! ```
//!
//! When that standard later reads 25.0, its own correction at 25.0 has to be
//! derived from the table before the standard can serve as ground truth.
//!
//! ## Interpolation
//!
//! Between two consecutive setpoints `p1 <= x <= p2`:
//!
//! ```text
//! c(x) = c1 + (x − p1) × (c2 − c1) / (p2 − p1)
//! ```
//!
//! The reported uncertainty is the larger of the two bracketing entries.
//!
//! ## Edges
//!
//! Outside the characterized range the nearest edge entry is used as-is.
//! There is no extrapolation: calibration curves are not guaranteed to stay
//! linear beyond the points that were actually measured, so a clamped value
//! is a known limitation of the table rather than an estimate. Results carry
//! a `clamped` flag so certificates can mark such rows.
//!
//! ## Degenerate Tables
//!
//! - Empty: correction 0, value passes through unchanged
//! - Single entry: that entry's correction everywhere
//! - Duplicate setpoints: the first entry after sorting wins
//! - Entries with a non-finite setpoint are ignored

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// One published calibration point of a standard instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionTableEntry {
    /// Nominal reference value the point was characterized at
    pub setpoint: f64,
    /// Correction to add to a reading at this setpoint
    pub correction: f64,
    /// Expanded uncertainty at this setpoint
    #[serde(default)]
    pub uncertainty: f64,
}

impl CorrectionTableEntry {
    /// Create an entry
    pub const fn new(setpoint: f64, correction: f64, uncertainty: f64) -> Self {
        Self {
            setpoint,
            correction,
            uncertainty,
        }
    }
}

/// Correction derived for one reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedCorrection {
    /// Correction applicable at the reading
    pub correction: f64,
    /// `value + correction`
    pub corrected_value: f64,
    /// Uncertainty of the bracketing entries (larger of the two)
    pub uncertainty: f64,
    /// The reading was outside the table and an edge entry was used
    pub clamped: bool,
}

/// Setpoint-sorted correction table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CorrectionTableEntry>", into = "Vec<CorrectionTableEntry>")]
pub struct CorrectionTable {
    entries: Vec<CorrectionTableEntry>,
}

impl From<Vec<CorrectionTableEntry>> for CorrectionTable {
    fn from(mut entries: Vec<CorrectionTableEntry>) -> Self {
        entries.retain(|entry| entry.setpoint.is_finite());
        // stable sort keeps duplicate setpoints in input order
        entries.sort_by(|a, b| a.setpoint.total_cmp(&b.setpoint));
        Self { entries }
    }
}

impl From<CorrectionTable> for Vec<CorrectionTableEntry> {
    fn from(table: CorrectionTable) -> Self {
        table.entries
    }
}

impl FromIterator<CorrectionTableEntry> for CorrectionTable {
    fn from_iter<I: IntoIterator<Item = CorrectionTableEntry>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl CorrectionTable {
    /// Build a table from entries in any order
    pub fn from_entries(entries: &[CorrectionTableEntry]) -> Self {
        Self::from(entries.to_vec())
    }

    /// Entries sorted by setpoint
    pub fn entries(&self) -> &[CorrectionTableEntry] {
        &self.entries
    }

    /// True when the table holds no usable entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Characterized range `(lowest, highest)` setpoint
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => Some((first.setpoint, last.setpoint)),
            _ => None,
        }
    }

    /// Derive the correction for a reading
    pub fn interpolate(&self, value: f64) -> InterpolatedCorrection {
        let (first, last) = match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return InterpolatedCorrection {
                    correction: 0.0,
                    corrected_value: value,
                    uncertainty: 0.0,
                    clamped: false,
                }
            }
        };

        if value.is_nan() {
            return InterpolatedCorrection {
                correction: f64::NAN,
                corrected_value: f64::NAN,
                uncertainty: f64::NAN,
                clamped: false,
            };
        }

        if value <= first.setpoint {
            return edge(first, value, value < first.setpoint);
        }
        if value >= last.setpoint {
            return edge(last, value, value > last.setpoint);
        }

        let bracket = self
            .entries
            .windows(2)
            .find(|pair| pair[0].setpoint <= value && value <= pair[1].setpoint);

        match bracket {
            Some([low, high]) => {
                let span = high.setpoint - low.setpoint;
                let correction = if span > 0.0 {
                    low.correction + (value - low.setpoint) * (high.correction - low.correction) / span
                } else {
                    low.correction
                };
                InterpolatedCorrection {
                    correction,
                    corrected_value: value + correction,
                    uncertainty: low.uncertainty.max(high.uncertainty),
                    clamped: false,
                }
            }
            // unreachable for a sorted table with first < value < last
            _ => edge(last, value, false),
        }
    }
}

fn edge(entry: &CorrectionTableEntry, value: f64, clamped: bool) -> InterpolatedCorrection {
    if clamped {
        log_debug!(
            "Correction lookup: {} outside table, using setpoint {}",
            value, entry.setpoint
        );
    }
    InterpolatedCorrection {
        correction: entry.correction,
        corrected_value: value + entry.correction,
        uncertainty: entry.uncertainty,
        clamped,
    }
}

/// Interpolate directly over unsorted entries
pub fn interpolate(entries: &[CorrectionTableEntry], value: f64) -> InterpolatedCorrection {
    CorrectionTable::from_entries(entries).interpolate(value)
}
