//! Shared fixtures for integration tests
//!
//! Provides:
//! - An in-memory instrument registry implementing both lookup traits
//! - Call counters so tests can assert how often the backend was consulted
//! - A station's worth of sensors covering every quantity

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use metcal_core::{
    LookupError, LookupResult, QcRecord, QcTableLookup, SensorDirectory, SensorMetadata,
};

/// In-memory registry with call-counting spies
#[derive(Default)]
pub struct MockRegistry {
    sensors: HashMap<String, SensorMetadata>,
    records: HashMap<String, QcRecord>,
    pub sensor_calls: AtomicUsize,
    pub qc_calls: AtomicUsize,
    pub offline: AtomicBool,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sensor(mut self, id: &str, name: &str, sensor_type: &str) -> Self {
        self.sensors.insert(id.to_string(), SensorMetadata::new(name, sensor_type));
        self
    }

    pub fn with_record(mut self, id: &str, instrument: &str, tolerance: &str, unit: &str) -> Self {
        self.records.insert(id.to_string(), QcRecord::new(instrument, tolerance, unit));
        self
    }

    pub fn qc_calls(&self) -> usize {
        self.qc_calls.load(Ordering::SeqCst)
    }

    pub fn sensor_calls(&self) -> usize {
        self.sensor_calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> LookupResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(LookupError::Transport { reason: "connection refused".into() })
        } else {
            Ok(())
        }
    }
}

impl SensorDirectory for MockRegistry {
    fn sensor(&self, sensor_id: &str) -> LookupResult<Option<SensorMetadata>> {
        self.sensor_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.sensors.get(sensor_id).cloned())
    }
}

impl QcTableLookup for MockRegistry {
    fn qc_record(&self, sensor_id: &str) -> LookupResult<Option<QcRecord>> {
        self.qc_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.records.get(sensor_id).cloned())
    }
}

/// One automatic weather station: every quantity plus an unclassifiable sensor
pub fn station_registry() -> MockRegistry {
    MockRegistry::new()
        .with_sensor("t-01", "Sensor Suhu Udara", "Termometer")
        .with_sensor("rh-01", "Sensor Kelembaban", "Higrometer")
        .with_sensor("p-01", "Barometer Digital", "Tekanan Udara")
        .with_sensor("ws-01", "Anemometer", "Kecepatan Angin")
        .with_sensor("wd-01", "Wind Vane", "Arah Angin")
        .with_sensor("rr-01", "Penakar Hujan", "Curah Hujan")
        .with_sensor("sr-01", "Pyranometer", "Radiasi Matahari")
        .with_record("t-01", "Termometer Digital", "± 0.2", "°C")
        .with_record("p-01", "Barometer Digital", "± 0.3", "hPa")
        .with_record("ws-01", "Anemometer", "lihat manual", "m/s")
}
