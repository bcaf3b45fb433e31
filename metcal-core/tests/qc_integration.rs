//! Integration tests for the QC engine
//!
//! Exercises the complete flow from reading rows through sensor
//! classification, limit resolution and classification into a report.

mod common;

use metcal_core::{
    LimitKind, LimitStrategy, QcEngine, QcSettings, ReadingRow, SensorQuantity,
};

use common::{station_registry, MockRegistry};

fn fixed_engine(registry: &MockRegistry) -> QcEngine<&MockRegistry, &MockRegistry> {
    QcEngine::new(registry, registry, QcSettings::default())
}

fn dynamic_engine(registry: &MockRegistry) -> QcEngine<&MockRegistry, &MockRegistry> {
    QcEngine::new(
        registry,
        registry,
        QcSettings::default().with_strategy(LimitStrategy::Dynamic),
    )
}

#[test]
fn station_quantities() {
    let registry = station_registry();
    let engine = fixed_engine(&registry);

    assert_eq!(engine.quantity("t-01"), SensorQuantity::Temperature);
    assert_eq!(engine.quantity("rh-01"), SensorQuantity::Humidity);
    assert_eq!(engine.quantity("p-01"), SensorQuantity::Pressure);
    assert_eq!(engine.quantity("ws-01"), SensorQuantity::WindSpeed);
    assert_eq!(engine.quantity("wd-01"), SensorQuantity::WindDirection);
    assert_eq!(engine.quantity("rr-01"), SensorQuantity::Rainfall);
    assert_eq!(engine.quantity("sr-01"), SensorQuantity::Unknown);
    assert_eq!(engine.quantity("missing"), SensorQuantity::Unknown);
}

#[test]
fn fixed_strategy_report() {
    let registry = station_registry();
    let engine = fixed_engine(&registry);

    let rows = vec![
        ReadingRow::new(0, "t-01", 25.05, 25.0),   // 0.05 within 0.1
        ReadingRow::new(1, "t-01", 25.3, 25.0),    // 0.3 outside 0.1
        ReadingRow::new(2, "rh-01", 50.0, 45.5),   // 4.5 within 5 (ref exactly 50)
        ReadingRow::new(3, "rh-01", 80.0, 76.5),   // 3.5 outside 3
        ReadingRow::new(4, "ws-01", 10.0, 9.1),    // 0.9 within 1.0
        ReadingRow::new(5, "sr-01", 800.0, 650.0), // unknown sensor always passes
    ];
    let report = engine.evaluate_rows(&rows);

    let verdicts: Vec<bool> = report.rows.iter().map(|r| r.evaluation.passed).collect();
    assert_eq!(verdicts, vec![true, false, true, false, true, true]);
    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.failed, 2);
    assert_eq!(report.summary.unresolved, 1);
    assert_eq!(report.rows[5].evaluation.limit_display(), "N/A");
    assert_eq!(report.rows[2].evaluation.limit_display(), "± 5 %RH");
}

#[test]
fn sensor_quantities_are_memoized() {
    let registry = station_registry();
    let engine = fixed_engine(&registry);

    let rows: Vec<_> = (0..20).map(|i| ReadingRow::new(i, "t-01", 20.0, 20.0)).collect();
    engine.evaluate_rows(&rows);
    assert_eq!(registry.sensor_calls(), 1);

    engine.clear_cache();
    engine.quantity("t-01");
    assert_eq!(registry.sensor_calls(), 2);
}

#[test]
fn dynamic_lookup_is_cached_per_sensor() {
    let registry = station_registry();
    let engine = dynamic_engine(&registry);

    let first = engine.resolve_dynamic_limit("p-01");
    let second = engine.resolve_dynamic_limit("p-01");
    assert_eq!(first, second);
    assert_eq!(first.map(|l| l.value), Some(0.3));
    assert_eq!(registry.qc_calls(), 1);
}

#[test]
fn dynamic_strategy_report() {
    let registry = station_registry();
    let engine = dynamic_engine(&registry);

    let rows = vec![
        ReadingRow::new(0, "t-01", 25.15, 25.0),  // 0.15 within ± 0.2
        ReadingRow::new(1, "p-01", 1010.0, 1009.5), // 0.5 outside ± 0.3
        ReadingRow::new(2, "rh-01", 80.0, 60.0),  // no QC record
        ReadingRow::new(3, "ws-01", 3.0, 9.0),    // unparseable tolerance: explicit ∞
        ReadingRow::new(4, "rh-01", 80.0, 60.0),
    ];
    let report = engine.evaluate_rows(&rows);

    assert!(report.rows[0].evaluation.passed);
    assert!(!report.rows[1].evaluation.passed);
    assert_eq!(report.rows[1].evaluation.limit_display(), "± 0.3 hPa");

    let no_record = &report.rows[2].evaluation;
    assert!(no_record.passed);
    assert_eq!(no_record.limit_used.kind, LimitKind::Unresolved);
    assert_eq!(no_record.limit_display(), "N/A");

    let garbled = &report.rows[3].evaluation;
    assert!(garbled.passed);
    assert_eq!(garbled.limit_used.kind, LimitKind::Dynamic);
    assert_eq!(garbled.limit_display(), "± ∞ m/s");

    // rh-01 twice, "no record" cached after the first
    assert_eq!(registry.qc_calls(), 4);
}

#[test]
fn strategies_are_not_merged() {
    let registry = station_registry();

    // rh-01 has a fixed rule but no QC record
    let fixed = fixed_engine(&registry).resolve_limit("rh-01", 80.0);
    assert_eq!(fixed.kind, LimitKind::Fixed);
    assert_eq!(fixed.value, 3.0);

    let dynamic = dynamic_engine(&registry).resolve_limit("rh-01", 80.0);
    assert!(dynamic.is_unresolved());
}

#[test]
fn backend_outage_degrades_to_no_limit() {
    let registry = station_registry();
    let engine = dynamic_engine(&registry);
    registry.set_offline(true);

    let eval = engine.evaluate(&ReadingRow::new(0, "p-01", 1010.0, 1000.0));
    assert!(eval.passed);
    assert_eq!(eval.limit_display(), "N/A");
    assert_eq!(engine.dynamic_resolver().cached_entries(), 0);

    registry.set_offline(false);
    let eval = engine.evaluate(&ReadingRow::new(1, "p-01", 1010.0, 1000.0));
    assert!(!eval.passed);
}

#[test]
fn sensor_outage_is_unknown_and_not_cached() {
    let registry = station_registry();
    let engine = fixed_engine(&registry);
    registry.set_offline(true);

    assert_eq!(engine.quantity("t-01"), SensorQuantity::Unknown);
    registry.set_offline(false);
    assert_eq!(engine.quantity("t-01"), SensorQuantity::Temperature);
}
