//! Analyzer configuration. The random seed is a recognized option with a
//! fixed default so runs are reproducible; it is not a tuning surface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Detector parameters
    #[serde(default)]
    pub detector: DetectorConfig,
    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Fraction of records flagged as anomalous, in (0, 1)
    #[serde(default = "default_contamination")]
    pub contamination: f64,
    /// Number of isolation trees in the ensemble
    #[serde(default = "default_ensemble_size")]
    pub ensemble_size: usize,
    /// Seed for all ensemble randomness; fixed default for reproducibility
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

fn default_contamination() -> f64 {
    0.05
}

fn default_ensemble_size() -> usize {
    100
}

fn default_random_seed() -> u64 {
    42
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            contamination: default_contamination(),
            ensemble_size: default_ensemble_size(),
            random_seed: default_random_seed(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl AnalyzerConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<AnalyzerConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
