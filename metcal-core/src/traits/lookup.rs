//! External Lookup Traits
//!
//! Both lookups answer with `Ok(None)` when the backend has no matching row
//! and with `Err` only when the backend itself could not be consulted.

use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::errors::LookupResult;
use crate::quantity::{QuantityClassifier, SensorQuantity};

/// Sensor record as stored by the instrument registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorMetadata {
    /// Free-text sensor name, e.g. "Sensor Suhu Udara"
    pub name: String,
    /// Free-text sensor type, e.g. "Temperature"
    #[serde(rename = "type", default)]
    pub sensor_type: String,
    /// Instrument the sensor is mounted on
    #[serde(default)]
    pub instrument_id: Option<String>,
    /// Reference-grade sensor used as a calibration standard
    #[serde(default)]
    pub is_standard: bool,
}

impl SensorMetadata {
    /// Create metadata for a non-standard sensor without an instrument link
    pub fn new(name: impl Into<String>, sensor_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sensor_type: sensor_type.into(),
            instrument_id: None,
            is_standard: false,
        }
    }

    /// Physical quantity, classifying the type field first and the name second
    pub fn quantity<C: QuantityClassifier + ?Sized>(&self, classifier: &C) -> SensorQuantity {
        match classifier.classify(&self.sensor_type) {
            SensorQuantity::Unknown => classifier.classify(&self.name),
            quantity => quantity,
        }
    }
}

/// Per-instrument QC ("master QC") record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcRecord {
    /// Instrument type name the record is keyed by
    pub instrument_name: String,
    /// Tolerance exactly as typed into the QC table, e.g. "± 0.3"
    #[serde(default)]
    pub tolerance_raw: Option<String>,
    /// Unit column, may be empty
    #[serde(default)]
    pub unit: String,
    /// Backend row id
    #[serde(default)]
    pub record_id: Option<String>,
}

impl QcRecord {
    /// Create a record without a backend id
    pub fn new(
        instrument_name: impl Into<String>,
        tolerance_raw: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            instrument_name: instrument_name.into(),
            tolerance_raw: Some(tolerance_raw.into()),
            unit: unit.into(),
            record_id: None,
        }
    }
}

/// Sensor registry: sensor id → metadata
pub trait SensorDirectory {
    /// Fetch a sensor record
    fn sensor(&self, sensor_id: &str) -> LookupResult<Option<SensorMetadata>>;
}

/// QC table: sensor id → instrument → instrument type → QC record
pub trait QcTableLookup {
    /// Fetch the QC record that applies to a sensor
    fn qc_record(&self, sensor_id: &str) -> LookupResult<Option<QcRecord>>;
}

impl<T: SensorDirectory + ?Sized> SensorDirectory for &T {
    fn sensor(&self, sensor_id: &str) -> LookupResult<Option<SensorMetadata>> {
        (**self).sensor(sensor_id)
    }
}

impl<T: QcTableLookup + ?Sized> QcTableLookup for &T {
    fn qc_record(&self, sensor_id: &str) -> LookupResult<Option<QcRecord>> {
        (**self).qc_record(sensor_id)
    }
}
