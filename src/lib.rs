//! Logsift — unsupervised log anomaly detection pipeline.
//!
//! Modular structure:
//! - [`parser`] — Strict line grammar → typed log records
//! - [`features`] — Time-sorted engineered features with trailing-window counts
//! - [`detector`] — Isolation forest scoring and contamination thresholding
//! - [`pipeline`] — Batch orchestration: raw text → scored records
//! - [`logging`] — Structured JSON logging and per-stage diagnostics

pub mod config;
pub mod detector;
pub mod error;
pub mod features;
pub mod logging;
pub mod parser;
pub mod pipeline;

pub use config::AnalyzerConfig;
pub use detector::{detect, ScoredRecord};
pub use error::AnalyzerError;
pub use features::{generate, FeatureMatrix, FeatureVector};
pub use logging::{DiagnosticSink, RecordingSink, StructuredLogger, TracingSink};
pub use parser::{parse, LogRecord};
pub use pipeline::analyze;
