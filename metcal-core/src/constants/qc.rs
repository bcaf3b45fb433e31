//! QC Classifier Constants

/// Float comparison tolerance added to every limit.
///
/// Keeps readings that sit exactly on a limit from failing because of
/// binary rounding (0.3 - 0.2 != 0.1 in f64).
pub const QC_EPSILON: f64 = 1e-6;

/// Decimal places kept on a reported correction.
pub const CORRECTION_DECIMALS: u32 = 4;

/// Upper bound accepted for configured correction precision.
pub const MAX_CORRECTION_DECIMALS: u32 = 10;

/// Provenance label for limits taken from the fixed rule table.
pub const WMO_SOURCE_LABEL: &str = "WMO fixed rule";

/// Provenance label for limits that could not be resolved.
pub const UNRESOLVED_SOURCE_LABEL: &str = "unresolved";

/// Display marker used when no limit is known at all.
pub const NOT_AVAILABLE_LABEL: &str = "N/A";
