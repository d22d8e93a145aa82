//! Engineered per-record features and the numeric matrix handed to the detector.

mod generator;

pub use generator::generate;

use crate::parser::LogRecord;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Column names of the full feature matrix, in storage order.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "level_encoded",
    "time_gap_seconds",
    "error_count_1m",
    "warning_count_1m",
    "event_count_1m",
    "failed_login_count_1m",
    "rolling_error_rate",
    "message_length",
];

/// One record enriched with derived numeric fields. Created once by the
/// feature generator from the full time-sorted record set; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(flatten)]
    pub record: LogRecord,
    /// Ordinal severity: INFO=0, WARNING=1, ERROR=2, unknown=0
    pub level_encoded: u8,
    /// Seconds since the previous record in sorted order; 0 for the first
    pub time_gap_seconds: f64,
    /// ERROR records in the trailing 60s window (T-60s, T]
    pub error_count_1m: u32,
    /// WARNING records in the trailing window
    pub warning_count_1m: u32,
    /// All records in the trailing window (always >= 1: includes self)
    pub event_count_1m: u32,
    /// Records whose message contains "failed login" (case-insensitive)
    pub failed_login_count_1m: u32,
    /// error_count_1m / (event_count_1m + 1e-9)
    pub rolling_error_rate: f64,
    /// Character count of the message
    pub message_length: usize,
}

impl FeatureVector {
    fn row(&self) -> [f64; 8] {
        [
            f64::from(self.level_encoded),
            self.time_gap_seconds,
            f64::from(self.error_count_1m),
            f64::from(self.warning_count_1m),
            f64::from(self.event_count_1m),
            f64::from(self.failed_login_count_1m),
            self.rolling_error_rate,
            self.message_length as f64,
        ]
    }
}

/// Named-column numeric matrix. The detector selects the columns it needs
/// by name so a missing column surfaces as an explicit contract error
/// instead of silently shifting dimensions.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    columns: Vec<&'static str>,
    data: Array2<f64>,
}

impl FeatureMatrix {
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let data = Array2::from_shape_fn((vectors.len(), FEATURE_COLUMNS.len()), |(i, j)| {
            vectors[i].row()[j]
        });
        Self {
            columns: FEATURE_COLUMNS.to_vec(),
            data,
        }
    }

    /// Assemble a matrix with an explicit column set. Row width must match.
    pub fn new(columns: Vec<&'static str>, data: Array2<f64>) -> Self {
        assert_eq!(columns.len(), data.ncols(), "column/row width mismatch");
        Self { columns, data }
    }

    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Project onto `wanted` columns in order. Non-finite values become 0.0
    /// (the documented fill rule for missing numerics). Returns the names of
    /// any absent columns instead of a matrix.
    pub fn select(&self, wanted: &[&str]) -> Result<Array2<f64>, Vec<String>> {
        let mut indices = Vec::with_capacity(wanted.len());
        let mut missing = Vec::new();
        for &name in wanted {
            match self.columns.iter().position(|&c| c == name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Array2::from_shape_fn(
            (self.data.nrows(), indices.len()),
            |(i, j)| {
                let v = self.data[[i, indices[j]]];
                if v.is_finite() {
                    v
                } else {
                    0.0
                }
            },
        ))
    }
}
