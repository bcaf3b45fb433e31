//! QC Engine Facade
//!
//! Ties the collaborators together for report rendering:
//!
//! ```text
//! ReadingRow ──► sensor directory ──► SensorQuantity ──┐
//!      │                                               ├─► AcceptanceLimit ──► QcClassifier
//!      └───────► QC table (memoized) ──────────────────┘
//! ```
//!
//! The configured [`LimitStrategy`] picks exactly one resolver per run. An
//! unknown sensor type under the fixed strategy and a missing QC record
//! under the dynamic strategy both end up as the unresolved sentinel, which
//! reports print as "N/A".
//!
//! ```rust
//! use metcal_core::engine::QcEngine;
//! use metcal_core::traits::{QcRecord, QcTableLookup, SensorDirectory, SensorMetadata};
//! use metcal_core::{LookupError, QcSettings, ReadingRow};
//!
//! struct Registry;
//!
//! impl SensorDirectory for Registry {
//!     fn sensor(&self, _id: &str) -> Result<Option<SensorMetadata>, LookupError> {
//!         Ok(Some(SensorMetadata::new("Sensor Suhu", "Termometer")))
//!     }
//! }
//!
//! impl QcTableLookup for Registry {
//!     fn qc_record(&self, _id: &str) -> Result<Option<QcRecord>, LookupError> {
//!         Ok(None)
//!     }
//! }
//!
//! let engine = QcEngine::new(Registry, Registry, QcSettings::default());
//! let report = engine.evaluate_rows(&[ReadingRow::new(0, "t-01", 20.05, 20.0)]);
//! assert_eq!(report.summary.passed, 1);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::classify::{QcClassifier, QcEvaluation};
use crate::config::{LimitStrategy, QcSettings};
use crate::limits::{resolve_fixed_limit, AcceptanceLimit, DynamicLimitResolver};
use crate::quantity::{KeywordClassifier, QuantityClassifier, SensorQuantity};
use crate::report::{QcReport, ReadingRow};
use crate::traits::{QcTableLookup, SensorDirectory};

/// Resolves limits for sensors and classifies their readings
pub struct QcEngine<D, L, C = KeywordClassifier> {
    directory: D,
    dynamic: DynamicLimitResolver<L>,
    quantities: C,
    quantity_cache: RwLock<HashMap<String, SensorQuantity>>,
    classifier: QcClassifier,
    strategy: LimitStrategy,
}

impl<D, L> QcEngine<D, L, KeywordClassifier>
where
    D: SensorDirectory,
    L: QcTableLookup,
{
    /// Engine with the default keyword table
    pub fn new(directory: D, qc_table: L, settings: QcSettings) -> Self {
        Self::with_classifier(directory, qc_table, KeywordClassifier::default(), settings)
    }
}

impl<D, L, C> QcEngine<D, L, C>
where
    D: SensorDirectory,
    L: QcTableLookup,
    C: QuantityClassifier,
{
    /// Engine with a custom quantity classifier
    pub fn with_classifier(directory: D, qc_table: L, quantities: C, settings: QcSettings) -> Self {
        Self {
            directory,
            dynamic: DynamicLimitResolver::new(qc_table),
            quantities,
            quantity_cache: RwLock::new(HashMap::new()),
            classifier: settings.classifier(),
            strategy: settings.strategy,
        }
    }

    /// Active limit strategy
    pub fn strategy(&self) -> LimitStrategy {
        self.strategy
    }

    /// Physical quantity of a sensor; lookup failures classify as `Unknown`
    pub fn quantity(&self, sensor_id: &str) -> SensorQuantity {
        let cached = self
            .quantity_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sensor_id)
            .copied();
        if let Some(quantity) = cached {
            return quantity;
        }

        let quantity = match self.directory.sensor(sensor_id) {
            Ok(Some(sensor)) => sensor.quantity(&self.quantities),
            Ok(None) => SensorQuantity::Unknown,
            Err(err) => {
                log_warn!("Sensor lookup for {} failed: {}", sensor_id, err);
                return SensorQuantity::Unknown;
            }
        };

        if !quantity.is_known() {
            log_warn!("Unknown sensor type for {}, no fixed QC rule applies", sensor_id);
        }
        self.quantity_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sensor_id.to_string(), quantity);
        quantity
    }

    /// Fixed-table limit for a sensor at a reference reading
    pub fn resolve_fixed_limit(&self, sensor_id: &str, reference_value: f64) -> AcceptanceLimit {
        resolve_fixed_limit(self.quantity(sensor_id), reference_value)
    }

    /// Per-instrument limit for a sensor, `None` when no QC record is known
    pub fn resolve_dynamic_limit(&self, sensor_id: &str) -> Option<AcceptanceLimit> {
        self.dynamic.resolve(sensor_id)
    }

    /// Limit under the configured strategy, unresolved sentinel when none
    pub fn resolve_limit(&self, sensor_id: &str, reference_value: f64) -> AcceptanceLimit {
        match self.strategy {
            LimitStrategy::Fixed => self.resolve_fixed_limit(sensor_id, reference_value),
            LimitStrategy::Dynamic => self
                .resolve_dynamic_limit(sensor_id)
                .unwrap_or_else(AcceptanceLimit::unresolved),
        }
    }

    /// Classify a single row
    pub fn evaluate(&self, row: &ReadingRow) -> QcEvaluation {
        let limit = self.resolve_limit(&row.sensor_id, row.standard);
        self.classifier.classify(row.standard, row.uut, &limit)
    }

    /// Classify a batch of rows into a report
    pub fn evaluate_rows(&self, rows: &[ReadingRow]) -> QcReport {
        let limits: Vec<AcceptanceLimit> = rows
            .iter()
            .map(|row| self.resolve_limit(&row.sensor_id, row.standard))
            .collect();
        QcReport::from_resolved(rows, &limits, &self.classifier)
    }

    /// Forget memoized QC limits and sensor quantities
    pub fn clear_cache(&self) {
        self.dynamic.clear_cache();
        self.quantity_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Memoizing dynamic resolver
    pub fn dynamic_resolver(&self) -> &DynamicLimitResolver<L> {
        &self.dynamic
    }
}
