//! WMO Fixed Rule Table
//!
//! Acceptance limits applied when no per-instrument QC record is used.
//! Relative rules (wind speed above the threshold, rainfall) take the
//! standard/reference reading as their base, not the UUT reading.

// ===== TEMPERATURE =====

/// Maximum allowed |correction| for air temperature sensors (°C).
pub const TEMPERATURE_LIMIT_C: f64 = 0.1;

// ===== PRESSURE =====

/// Maximum allowed |correction| for barometric sensors (hPa).
pub const PRESSURE_LIMIT_HPA: f64 = 0.1;

// ===== HUMIDITY =====

/// Reference humidity above which the tighter limit applies (%RH).
///
/// The comparison is strict: a reference of exactly 50 %RH uses the
/// looser [`HUMIDITY_LIMIT_LOW_RH_PCT`].
pub const HUMIDITY_RH_THRESHOLD_PCT: f64 = 50.0;

/// Limit for references strictly above the threshold (%RH).
pub const HUMIDITY_LIMIT_HIGH_RH_PCT: f64 = 3.0;

/// Limit for references at or below the threshold (%RH).
pub const HUMIDITY_LIMIT_LOW_RH_PCT: f64 = 5.0;

// ===== WIND =====

/// Reference wind speed at or below which the absolute limit applies (m/s).
pub const WIND_SPEED_THRESHOLD_MS: f64 = 5.0;

/// Absolute wind speed limit for low speeds (m/s).
pub const WIND_SPEED_LIMIT_LOW_MS: f64 = 0.5;

/// Fraction of the reference speed allowed above the threshold.
pub const WIND_SPEED_RELATIVE_LIMIT: f64 = 0.10;

/// Maximum allowed |correction| for wind vanes (degrees).
pub const WIND_DIRECTION_LIMIT_DEG: f64 = 5.0;

// ===== RAINFALL =====

/// Fraction of the reference rainfall amount allowed.
pub const RAINFALL_RELATIVE_LIMIT: f64 = 0.05;
