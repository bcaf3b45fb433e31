//! Constants for metcal Core
//!
//! Centralized numeric values used by the limit resolver, the QC classifier
//! and the correction interpolator. Every rule value from the fixed WMO table
//! lives here so the rule functions read as plain conditionals.
//!
//! ## Organization
//!
//! - **WMO**: fixed acceptance-limit rule table, per physical quantity
//! - **QC**: comparison tolerance, display precision and sentinel labels
//!
//! ## Usage Guidelines
//!
//! 1. Use these constants instead of magic numbers
//! 2. Include the unit in the name where the value carries one
//! 3. When a rule changes after review against the WMO guideline, change it
//!    here and update the boundary tests in `limits::fixed`

/// Fixed acceptance-limit rules derived from WMO calibration guidance.
pub mod wmo;

/// Classifier tolerances, display precision and provenance labels.
pub mod qc;

pub use wmo::{
    TEMPERATURE_LIMIT_C, PRESSURE_LIMIT_HPA, WIND_DIRECTION_LIMIT_DEG,
    HUMIDITY_LIMIT_HIGH_RH_PCT, HUMIDITY_LIMIT_LOW_RH_PCT, HUMIDITY_RH_THRESHOLD_PCT,
    WIND_SPEED_LIMIT_LOW_MS, WIND_SPEED_THRESHOLD_MS, WIND_SPEED_RELATIVE_LIMIT,
    RAINFALL_RELATIVE_LIMIT,
};

pub use qc::{
    QC_EPSILON, CORRECTION_DECIMALS, MAX_CORRECTION_DECIMALS,
    WMO_SOURCE_LABEL, UNRESOLVED_SOURCE_LABEL, NOT_AVAILABLE_LABEL,
};
