//! QC Settings
//!
//! Settings travel as a small JSON document alongside the rest of the
//! application configuration. Every field is optional:
//!
//! ```json
//! { "epsilon": 1e-6, "correction_decimals": 4, "strategy": "dynamic" }
//! ```
//!
//! Missing fields take the defaults from [`crate::constants::qc`]; the fixed
//! WMO table is the default strategy.

use serde::{Deserialize, Serialize};

use crate::classify::QcClassifier;
use crate::constants::qc::{CORRECTION_DECIMALS, MAX_CORRECTION_DECIMALS, QC_EPSILON};
use crate::errors::SettingsError;

/// Which limit resolver a QC run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitStrategy {
    /// Fixed WMO rule table keyed by sensor quantity
    #[default]
    Fixed,
    /// Per-instrument QC record from the registry
    Dynamic,
}

/// Tunables for a QC run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcSettings {
    /// Float tolerance added to every limit
    pub epsilon: f64,
    /// Decimal places kept on corrections
    pub correction_decimals: u32,
    /// Limit resolution strategy
    pub strategy: LimitStrategy,
}

impl Default for QcSettings {
    fn default() -> Self {
        Self {
            epsilon: QC_EPSILON,
            correction_decimals: CORRECTION_DECIMALS,
            strategy: LimitStrategy::Fixed,
        }
    }
}

impl QcSettings {
    /// Set the comparison tolerance
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the correction precision
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.correction_decimals = decimals;
        self
    }

    /// Set the limit strategy
    pub fn with_strategy(mut self, strategy: LimitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reject values the classifier cannot honor
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(SettingsError::InvalidEpsilon { value: self.epsilon });
        }
        if self.correction_decimals > MAX_CORRECTION_DECIMALS {
            return Err(SettingsError::TooManyDecimals {
                decimals: self.correction_decimals,
                max: MAX_CORRECTION_DECIMALS,
            });
        }
        Ok(())
    }

    /// Classifier configured from these settings
    pub fn classifier(&self) -> QcClassifier {
        QcClassifier::new(self.epsilon, self.correction_decimals)
    }

    /// Parse and validate a JSON settings document
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}
