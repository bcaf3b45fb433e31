//! Collaborator Interfaces for the QC Engine
//!
//! The engine computes; it does not own data. Sensor records, per-instrument
//! QC tables and standard-instrument certificates live in an external hosted
//! database and are reached through the traits in this module.
//!
//! ## Module Organization
//!
//! - [`lookup`] - sensor directory and QC table lookups plus their records
//!
//! ## Implementing a Lookup
//!
//! ```rust
//! use metcal_core::traits::{QcRecord, QcTableLookup};
//! use metcal_core::LookupError;
//!
//! struct Fixture;
//!
//! impl QcTableLookup for Fixture {
//!     fn qc_record(&self, sensor_id: &str) -> Result<Option<QcRecord>, LookupError> {
//!         Ok((sensor_id == "rh-01").then(|| QcRecord::new("Thermohygrometer", "± 3", "%RH")))
//!     }
//! }
//! ```
//!
//! The HTTP implementations live in the `metcal-connectors` crate.

pub mod lookup;

pub use lookup::{QcRecord, QcTableLookup, SensorDirectory, SensorMetadata};
