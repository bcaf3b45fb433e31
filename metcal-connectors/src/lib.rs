//! Instrument Registry Connectors
//!
//! ## Overview
//!
//! `metcal-core` reaches the instrument registry only through two traits,
//! [`SensorDirectory`](metcal_core::SensorDirectory) and
//! [`QcTableLookup`](metcal_core::QcTableLookup). This crate provides the
//! network-backed implementations of those traits.
//!
//! ### HTTP/HTTPS
//!
//! **When to use:**
//! - The registry is exposed as a REST/JSON API (PostgREST-style tables,
//!   hosted database front-ends, in-house services)
//! - Bearer, Basic or API-key authentication
//!
//! **Characteristics:**
//! - Blocking requests on a pooled `ureq` agent; no async runtime
//! - Retries on 5xx, 429 and transport errors with linear backoff
//! - 404 and empty result sets mean "no record", never an error
//!
//! ## Failure Semantics
//!
//! Transport failures surface as [`LookupError`](metcal_core::LookupError).
//! The core resolvers log them and fall back to "no limit found", so an
//! unreachable registry degrades a QC run instead of aborting it.
//!
//! ## Example Usage
//!
//! ```no_run
//! use metcal_connectors::http::{HttpConfig, HttpLookup};
//! use metcal_core::{QcEngine, QcSettings, LimitStrategy, ReadingRow};
//!
//! let config = HttpConfig::new("https://registry.example.org/rest/v1")
//!     .api_key("apikey", "anon-key")
//!     .sensor_path("/sensors?id=eq.{sensor_id}")
//!     .qc_path("/master_qc?sensor_id=eq.{sensor_id}");
//! let lookup = HttpLookup::new(config)?;
//!
//! let engine = QcEngine::new(
//!     &lookup,
//!     &lookup,
//!     QcSettings::default().with_strategy(LimitStrategy::Dynamic),
//! );
//! let eval = engine.evaluate(&ReadingRow::new(0, "sensor-7", 1013.4, 1013.1));
//! println!("{} within {}", eval.correction, eval.limit_display());
//! println!("{:?}", lookup.stats());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{AuthMethod, HttpConfig, HttpError, HttpLookup};

/// Request statistics common to all connectors
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionStats {
    /// Requests answered by the backend
    pub requests_sent: u64,
    /// Requests that failed after all retries
    pub requests_failed: u64,
    /// Retry attempts made
    pub retries: u64,
    /// Response body bytes received
    pub bytes_received: u64,
    /// Last error message
    pub last_error: Option<String>,
}

impl ConnectionStats {
    /// Fraction of requests that ultimately failed
    pub fn failure_rate(&self) -> Option<f64> {
        let total = self.requests_sent + self.requests_failed;
        if total == 0 {
            None
        } else {
            Some(self.requests_failed as f64 / total as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_rate() {
        let mut stats = ConnectionStats::default();
        assert_eq!(stats.failure_rate(), None);

        stats.requests_sent = 3;
        stats.requests_failed = 1;
        assert_eq!(stats.failure_rate(), Some(0.25));
    }
}
