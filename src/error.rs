//! Pipeline error type. Malformed input lines are not errors (they are
//! dropped and reported through the diagnostic sink); errors here are
//! broken contracts between stages or bad configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The feature matrix handed to the detector lacks required columns.
    /// Indicates a broken contract between stages, not recoverable data.
    #[error("feature matrix is missing required columns: {0:?}")]
    MissingFeatures(Vec<String>),

    /// Contamination must lie strictly between 0 and 1.
    #[error("contamination must be in (0, 1), got {0}")]
    InvalidContamination(f64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
