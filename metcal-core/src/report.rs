//! Batch QC Reports
//!
//! A QC report classifies every imported reading row of a calibration run
//! and summarizes the outcome. Rows are independent, so once the limit for
//! each row is known the classification is a plain map; with the
//! `parallel` feature it runs on the rayon thread pool.
//!
//! Limit resolution is kept out of the parallel section: it may go through
//! an external lookup and a cache, and is cheap once the cache is warm.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::classify::{QcClassifier, QcEvaluation};
use crate::limits::AcceptanceLimit;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Milliseconds since the Unix epoch, as produced by the spreadsheet import
pub type Timestamp = i64;

/// One imported standard/UUT pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRow {
    /// Time the pair was recorded
    pub timestamp: Timestamp,
    /// Sensor under test
    pub sensor_id: String,
    /// Standard instrument reading
    pub standard: f64,
    /// Unit-under-test reading
    pub uut: f64,
}

impl ReadingRow {
    /// Create a row
    pub fn new(timestamp: Timestamp, sensor_id: impl Into<String>, standard: f64, uut: f64) -> Self {
        Self {
            timestamp,
            sensor_id: sensor_id.into(),
            standard,
            uut,
        }
    }
}

/// A row together with its verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowEvaluation {
    /// Source row
    pub row: ReadingRow,
    /// Classification result
    pub evaluation: QcEvaluation,
}

/// Aggregate counts over a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QcSummary {
    /// Rows classified
    pub total: usize,
    /// Rows within their limit
    pub passed: usize,
    /// Rows outside their limit, including invalid ones
    pub failed: usize,
    /// Rows whose correction could not be computed
    pub invalid: usize,
    /// Rows judged against an unresolved limit
    pub unresolved: usize,
    /// Largest |correction| among valid rows
    pub max_abs_correction: Option<f64>,
}

impl QcSummary {
    /// Fraction of rows that passed, `None` for an empty report
    pub fn pass_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.passed as f64 / self.total as f64)
        }
    }

    fn record(&mut self, evaluation: &QcEvaluation) {
        self.total += 1;
        if evaluation.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        if evaluation.limit_used.is_unresolved() {
            self.unresolved += 1;
        }
        if evaluation.is_valid() {
            let magnitude = libm::fabs(evaluation.correction);
            self.max_abs_correction = Some(match self.max_abs_correction {
                Some(current) => current.max(magnitude),
                None => magnitude,
            });
        } else {
            self.invalid += 1;
        }
    }
}

/// Classified rows plus summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QcReport {
    /// Per-row results in input order
    pub rows: Vec<RowEvaluation>,
    /// Aggregates over `rows`
    pub summary: QcSummary,
}

impl QcReport {
    /// Build a report from rows and their already-resolved limits
    ///
    /// `limits` pairs with `rows` by position; rows without a limit are
    /// classified against the unresolved sentinel.
    pub fn from_resolved(
        rows: &[ReadingRow],
        limits: &[AcceptanceLimit],
        classifier: &QcClassifier,
    ) -> Self {
        let evaluations = classify_rows(rows, limits, classifier);

        let mut summary = QcSummary::default();
        for evaluation in &evaluations {
            summary.record(evaluation);
        }

        let rows = rows
            .iter()
            .cloned()
            .zip(evaluations)
            .map(|(row, evaluation)| RowEvaluation { row, evaluation })
            .collect();

        Self { rows, summary }
    }

    /// Rows that failed QC
    pub fn failures(&self) -> impl Iterator<Item = &RowEvaluation> {
        self.rows.iter().filter(|r| !r.evaluation.passed)
    }
}

/// Classify every row against the limit at the same position
#[cfg(not(feature = "parallel"))]
pub fn classify_rows(
    rows: &[ReadingRow],
    limits: &[AcceptanceLimit],
    classifier: &QcClassifier,
) -> Vec<QcEvaluation> {
    let unresolved = AcceptanceLimit::unresolved();
    rows.iter()
        .enumerate()
        .map(|(i, row)| classifier.classify(row.standard, row.uut, limits.get(i).unwrap_or(&unresolved)))
        .collect()
}

/// Classify every row against the limit at the same position
#[cfg(feature = "parallel")]
pub fn classify_rows(
    rows: &[ReadingRow],
    limits: &[AcceptanceLimit],
    classifier: &QcClassifier,
) -> Vec<QcEvaluation> {
    let unresolved = AcceptanceLimit::unresolved();
    rows.par_iter()
        .enumerate()
        .map(|(i, row)| classifier.classify(row.standard, row.uut, limits.get(i).unwrap_or(&unresolved)))
        .collect()
}
