//! Memoized Per-Instrument Limit Lookup
//!
//! ## Caching
//!
//! Every sensor id is looked up at most once per resolver instance. Both
//! outcomes of a successful lookup are cached: a parsed limit, and "no QC
//! record exists" (`None`). A transport failure is *not* cached, so a
//! temporarily unreachable backend is retried on the next call; the failing
//! call itself still reports "no limit found".
//!
//! The cache lock is never held across the external lookup. Two threads
//! missing on the same id may both query the backend; the answers are
//! identical for a given id, so whichever write lands last is as good as
//! the first.
//!
//! ```rust
//! use metcal_core::limits::DynamicLimitResolver;
//! use metcal_core::traits::{QcRecord, QcTableLookup};
//! use metcal_core::LookupError;
//!
//! struct Registry;
//!
//! impl QcTableLookup for Registry {
//!     fn qc_record(&self, _id: &str) -> Result<Option<QcRecord>, LookupError> {
//!         Ok(Some(QcRecord::new("Barometer", "± 0.3", "hPa")))
//!     }
//! }
//!
//! let resolver = DynamicLimitResolver::new(Registry);
//! let limit = resolver.resolve("baro-01").expect("record exists");
//! assert_eq!(limit.display(), "± 0.3 hPa");
//! assert_eq!(resolver.cached_entries(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::errors::LookupError;
use crate::traits::QcTableLookup;

use super::{limit_from_record, AcceptanceLimit};

/// Outcome of a dynamic lookup, for callers that report the difference
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicResolution {
    /// A QC record exists; its tolerance may still have parsed to `+∞`
    Limit(AcceptanceLimit),
    /// The backend has no QC record for this sensor
    NoRecord,
    /// The backend could not be consulted
    LookupFailed(LookupError),
}

impl DynamicResolution {
    /// Collapse to the limit, treating failures as "no limit found"
    pub fn into_limit(self) -> Option<AcceptanceLimit> {
        match self {
            Self::Limit(limit) => Some(limit),
            Self::NoRecord | Self::LookupFailed(_) => None,
        }
    }
}

/// Per-sensor memoizing resolver over a [`QcTableLookup`]
pub struct DynamicLimitResolver<L> {
    lookup: L,
    cache: RwLock<HashMap<String, Option<AcceptanceLimit>>>,
}

impl<L: QcTableLookup> DynamicLimitResolver<L> {
    /// Create a resolver with an empty cache
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the limit for a sensor, `None` when no limit is known
    pub fn resolve(&self, sensor_id: &str) -> Option<AcceptanceLimit> {
        self.resolve_detailed(sensor_id).into_limit()
    }

    /// Resolve and report why no limit was found
    pub fn resolve_detailed(&self, sensor_id: &str) -> DynamicResolution {
        if let Some(cached) = self.cached(sensor_id) {
            log_debug!("QC limit cache hit for sensor {}", sensor_id);
            return match cached {
                Some(limit) => DynamicResolution::Limit(limit),
                None => DynamicResolution::NoRecord,
            };
        }

        log_debug!("QC limit cache miss for sensor {}", sensor_id);
        match self.lookup.qc_record(sensor_id) {
            Ok(record) => {
                let limit = record.as_ref().map(limit_from_record);
                self.store(sensor_id, limit.clone());
                match limit {
                    Some(limit) => DynamicResolution::Limit(limit),
                    None => DynamicResolution::NoRecord,
                }
            }
            Err(err) => {
                log_warn!("QC lookup for sensor {} failed: {}", sensor_id, err);
                DynamicResolution::LookupFailed(err)
            }
        }
    }

    /// Drop every memoized entry
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of memoized sensor ids (including "no record" entries)
    pub fn cached_entries(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Underlying lookup
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    fn cached(&self, sensor_id: &str) -> Option<Option<AcceptanceLimit>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sensor_id)
            .cloned()
    }

    fn store(&self, sensor_id: &str, limit: Option<AcceptanceLimit>) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sensor_id.to_string(), limit);
    }
}
