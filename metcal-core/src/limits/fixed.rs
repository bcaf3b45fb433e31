//! Fixed WMO Rule Table
//!
//! Relative rules use the reference (standard) reading as the percentage
//! base. That placement, and the strict/inclusive boundaries at 50 %RH and
//! 5 m/s, follow the rule table as currently operated; they have not been
//! re-checked against the published WMO guideline and the boundary tests
//! below pin them down until they are.

use crate::constants::{
    qc::WMO_SOURCE_LABEL,
    wmo::{
        HUMIDITY_LIMIT_HIGH_RH_PCT, HUMIDITY_LIMIT_LOW_RH_PCT, HUMIDITY_RH_THRESHOLD_PCT,
        PRESSURE_LIMIT_HPA, RAINFALL_RELATIVE_LIMIT, TEMPERATURE_LIMIT_C,
        WIND_DIRECTION_LIMIT_DEG, WIND_SPEED_LIMIT_LOW_MS, WIND_SPEED_RELATIVE_LIMIT,
        WIND_SPEED_THRESHOLD_MS,
    },
};
use crate::quantity::SensorQuantity;

use super::AcceptanceLimit;

/// Resolve the fixed acceptance limit for a quantity at a reference reading
///
/// `Unknown` resolves to the unresolved `+∞` sentinel rather than a rule.
pub fn resolve_fixed_limit(quantity: SensorQuantity, reference_value: f64) -> AcceptanceLimit {
    let value = match quantity {
        SensorQuantity::Temperature => TEMPERATURE_LIMIT_C,
        SensorQuantity::Pressure => PRESSURE_LIMIT_HPA,
        SensorQuantity::Humidity => {
            if reference_value > HUMIDITY_RH_THRESHOLD_PCT {
                HUMIDITY_LIMIT_HIGH_RH_PCT
            } else {
                HUMIDITY_LIMIT_LOW_RH_PCT
            }
        }
        SensorQuantity::WindSpeed => {
            if reference_value <= WIND_SPEED_THRESHOLD_MS {
                WIND_SPEED_LIMIT_LOW_MS
            } else {
                reference_value * WIND_SPEED_RELATIVE_LIMIT
            }
        }
        SensorQuantity::WindDirection => WIND_DIRECTION_LIMIT_DEG,
        SensorQuantity::Rainfall => reference_value * RAINFALL_RELATIVE_LIMIT,
        SensorQuantity::Unknown => return AcceptanceLimit::unresolved(),
    };

    AcceptanceLimit::fixed(value, quantity.unit(), WMO_SOURCE_LABEL)
}
