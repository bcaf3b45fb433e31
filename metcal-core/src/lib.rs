//! QC engine for meteorological calibration certificates
//!
//! Evaluates paired standard/UUT readings against acceptance limits and
//! derives standard-instrument corrections from published calibration
//! tables. Everything here is pure computation; the instrument registry
//! behind the dynamic limits is reached through the traits in [`traits`].
//!
//! Key properties:
//! - No panics on business data: bad input degrades to documented sentinels
//! - Limits are never negative and never silently zero
//! - Pure parts build without `std` (`alloc` only)
//!
//! ```
//! use metcal_core::{classify, interpolate, resolve_fixed_limit, CorrectionTableEntry, SensorQuantity};
//!
//! let limit = resolve_fixed_limit(SensorQuantity::Humidity, 75.0);
//! let eval = classify(75.0, 73.5, &limit);
//! assert!(eval.passed);
//! assert_eq!(eval.limit_display(), "± 3 %RH");
//!
//! let table = [
//!     CorrectionTableEntry::new(0.0, 0.0, 0.1),
//!     CorrectionTableEntry::new(10.0, 1.0, 0.1),
//! ];
//! assert_eq!(interpolate(&table, 5.0).corrected_value, 5.5);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod certificate;
pub mod classify;
pub mod config;
pub mod constants;
pub mod correction;
pub mod errors;
pub mod limits;
pub mod quantity;
pub mod report;
pub mod traits;

#[cfg(feature = "std")]
pub mod engine;

// Public API
pub use certificate::{calibration_row, CalibrationRow};
pub use classify::{classify, QcClassifier, QcEvaluation};
pub use config::{LimitStrategy, QcSettings};
pub use correction::{interpolate, CorrectionTable, CorrectionTableEntry, InterpolatedCorrection};
pub use errors::{LookupError, LookupResult, SettingsError};
pub use limits::{parse_tolerance, resolve_fixed_limit, AcceptanceLimit, LimitKind};
pub use quantity::{KeywordClassifier, QuantityClassifier, SensorQuantity};
pub use report::{QcReport, QcSummary, ReadingRow, RowEvaluation};
pub use traits::{QcRecord, QcTableLookup, SensorDirectory, SensorMetadata};

#[cfg(feature = "std")]
pub use engine::QcEngine;
#[cfg(feature = "std")]
pub use limits::{DynamicLimitResolver, DynamicResolution};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
