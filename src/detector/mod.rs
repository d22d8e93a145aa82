//! Unsupervised anomaly scoring over the engineered feature matrix, plus
//! contamination-driven flagging of the top scorers.

mod forest;

pub use forest::IsolationForest;

use crate::config::DetectorConfig;
use crate::error::AnalyzerError;
use crate::features::{FeatureMatrix, FeatureVector};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::info;

/// Model dimensions, selected by name from the feature matrix. The raw
/// event count feeds the rolling error rate but is not itself a dimension.
pub const MODEL_COLUMNS: [&str; 7] = [
    "level_encoded",
    "time_gap_seconds",
    "error_count_1m",
    "warning_count_1m",
    "rolling_error_rate",
    "message_length",
    "failed_login_count_1m",
];

/// Final pipeline output: one per retained input line, in feature order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub features: FeatureVector,
    /// Higher = more anomalous; in (0, 1)
    pub anomaly_score: f64,
    pub is_anomaly: bool,
}

fn validate_contamination(contamination: f64) -> Result<(), AnalyzerError> {
    if contamination > 0.0 && contamination < 1.0 {
        Ok(())
    } else {
        Err(AnalyzerError::InvalidContamination(contamination))
    }
}

/// Score every feature vector and flag the top `round(contamination * N)`.
/// Output preserves the input (time-sorted) order.
pub fn detect(
    features: &[FeatureVector],
    config: &DetectorConfig,
) -> Result<Vec<ScoredRecord>, AnalyzerError> {
    validate_contamination(config.contamination)?;
    if features.is_empty() {
        return Ok(Vec::new());
    }

    let matrix = FeatureMatrix::from_vectors(features);
    let (scores, flags) = score_matrix(&matrix, config)?;

    let scored: Vec<ScoredRecord> = features
        .iter()
        .zip(scores)
        .zip(flags)
        .map(|((fv, anomaly_score), is_anomaly)| ScoredRecord {
            features: fv.clone(),
            anomaly_score,
            is_anomaly,
        })
        .collect();

    info!(
        total = scored.len(),
        anomalies = scored.iter().filter(|r| r.is_anomaly).count(),
        contamination = config.contamination,
        "anomaly detection complete"
    );
    Ok(scored)
}

/// Matrix-level entry point: validates the schema (every model column must
/// be present, missing ones are reported by name), trains the ensemble and
/// returns per-row scores and flags.
pub fn score_matrix(
    matrix: &FeatureMatrix,
    config: &DetectorConfig,
) -> Result<(Vec<f64>, Vec<bool>), AnalyzerError> {
    validate_contamination(config.contamination)?;
    let x = matrix
        .select(&MODEL_COLUMNS)
        .map_err(AnalyzerError::MissingFeatures)?;

    let forest = IsolationForest::fit(x.view(), config.ensemble_size, config.random_seed);
    let scores: Vec<f64> = (0..x.nrows()).map(|i| forest.score(x.row(i))).collect();
    let flags = flag_top_scores(&scores, config.contamination);
    Ok((scores, flags))
}

/// Flag the `round(contamination * N)` highest scores. When the rounded
/// count is zero nothing is flagged (no rounding up). Ties at the cut are
/// broken deterministically: the earliest record wins.
fn flag_top_scores(scores: &[f64], contamination: f64) -> Vec<bool> {
    let n = scores.len();
    let mut flags = vec![false; n];
    let k = (contamination * n as f64).round() as usize;
    if k == 0 {
        return flags;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    for &i in order.iter().take(k.min(n)) {
        flags[i] = true;
    }
    flags
}
