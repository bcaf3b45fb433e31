//! Calibration Certificate Result Rows
//!
//! Each row of a certificate's result table compares the UUT against a
//! standard whose own reading is first corrected with the standard's
//! published table:
//!
//! ```text
//! true value      = standard reading + standard correction(standard reading)
//! UUT correction  = true value − UUT reading
//! ```

use serde::{Deserialize, Serialize};

use crate::classify::round_to;
use crate::constants::qc::CORRECTION_DECIMALS;
use crate::correction::CorrectionTable;

/// One line of a certificate result table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRow {
    /// Raw reading of the standard instrument
    pub standard_reading: f64,
    /// Reading of the unit under test
    pub uut_reading: f64,
    /// Standard's own correction at its reading
    pub standard_correction: f64,
    /// Corrected standard reading, taken as ground truth
    pub true_value: f64,
    /// `true_value − uut_reading`, rounded to the report precision
    pub uut_correction: f64,
    /// Uncertainty carried over from the standard's table
    pub uncertainty: f64,
    /// The standard reading was outside its characterized range
    pub extrapolated: bool,
}

/// Build a result row for one standard/UUT pair
pub fn calibration_row(table: &CorrectionTable, standard_reading: f64, uut_reading: f64) -> CalibrationRow {
    let standard = table.interpolate(standard_reading);
    let uut_correction = round_to(standard.corrected_value - uut_reading, CORRECTION_DECIMALS);

    CalibrationRow {
        standard_reading,
        uut_reading,
        standard_correction: standard.correction,
        true_value: standard.corrected_value,
        uut_correction,
        uncertainty: standard.uncertainty,
        extrapolated: standard.clamped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::CorrectionTableEntry;

    fn table() -> CorrectionTable {
        CorrectionTable::from_entries(&[
            CorrectionTableEntry::new(0.0, 0.0, 0.05),
            CorrectionTableEntry::new(10.0, 1.0, 0.05),
        ])
    }

    #[test]
    fn row_uses_corrected_standard() {
        let row = calibration_row(&table(), 5.0, 5.2);
        assert_eq!(row.standard_correction, 0.5);
        assert_eq!(row.true_value, 5.5);
        assert_eq!(row.uut_correction, 0.3);
        assert!(!row.extrapolated);
    }

    #[test]
    fn row_outside_range_is_flagged() {
        let row = calibration_row(&table(), 12.0, 13.0);
        assert_eq!(row.standard_correction, 1.0);
        assert_eq!(row.uut_correction, 0.0);
        assert!(row.extrapolated);
    }

    #[test]
    fn empty_table_uses_raw_standard() {
        let row = calibration_row(&CorrectionTable::default(), 21.0, 20.5);
        assert_eq!(row.true_value, 21.0);
        assert_eq!(row.uut_correction, 0.5);
    }
}
