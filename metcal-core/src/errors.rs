//! Error Types for the QC Engine
//!
//! ## Design Philosophy
//!
//! Malformed business data never becomes an error here. Unknown sensors,
//! unparseable tolerance strings, NaN readings and empty correction tables
//! all degrade to documented sentinels (`+∞` limits, `NaN` corrections,
//! pass-through interpolation) so the classifier stays a total function.
//!
//! Errors exist at exactly two seams:
//!
//! ### External Lookups
//! - `LookupError`: the sensor directory or QC table could not be reached or
//!   answered with something undecodable. The dynamic resolver catches these
//!   and reports "no limit found"; they never reach classification.
//!
//! ### Configuration
//! - `SettingsError`: QC settings failed to parse or carry impossible values.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use metcal_core::{LookupError, QcRecord, QcTableLookup};
//!
//! struct Offline;
//!
//! impl QcTableLookup for Offline {
//!     fn qc_record(&self, _sensor_id: &str) -> Result<Option<QcRecord>, LookupError> {
//!         Err(LookupError::Transport { reason: "backend unreachable".into() })
//!     }
//! }
//!
//! match Offline.qc_record("sensor-7") {
//!     Ok(Some(_record)) => {}   // parse the tolerance
//!     Ok(None) => {}            // no QC entry for this instrument
//!     Err(_e) => {}             // log and treat as "no QC entry"
//! }
//! ```

use alloc::string::String;
use thiserror_no_std::Error;

/// Result type for external lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Failures of the external collaborators behind the lookup traits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// Backend unreachable, timed out or refused the request
    #[error("Lookup transport failed: {reason}")]
    Transport {
        /// Transport-level description of the failure
        reason: String,
    },

    /// Backend answered, but not with a decodable record
    #[error("Lookup returned an invalid response: {reason}")]
    InvalidResponse {
        /// What was wrong with the payload
        reason: String,
    },
}

/// Rejected QC settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// Comparison tolerance must be finite and non-negative
    #[error("Invalid epsilon {value}: must be finite and >= 0")]
    InvalidEpsilon {
        /// Offending value
        value: f64,
    },

    /// Too many decimal places requested for corrections
    #[error("Correction precision {decimals} exceeds maximum {max}")]
    TooManyDecimals {
        /// Requested decimal places
        decimals: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Settings document could not be parsed
    #[error("Settings parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn lookup_error_messages() {
        let err = LookupError::Transport { reason: "timeout".into() };
        assert_eq!(err.to_string(), "Lookup transport failed: timeout");

        let err = LookupError::InvalidResponse { reason: "not json".into() };
        assert!(err.to_string().contains("not json"));
    }

    #[test]
    fn settings_error_messages() {
        let err = SettingsError::TooManyDecimals { decimals: 12, max: 10 };
        assert_eq!(err.to_string(), "Correction precision 12 exceeds maximum 10");
    }
}
