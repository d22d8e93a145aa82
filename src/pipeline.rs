//! Batch orchestration: raw text → records → feature vectors → scored
//! records. One synchronous pass, no stage overlap; this is the interface
//! presentation layers call.

use crate::config::AnalyzerConfig;
use crate::detector::{detect, ScoredRecord};
use crate::error::AnalyzerError;
use crate::features::generate;
use crate::logging::DiagnosticSink;
use crate::parser::parse;
use tracing::info;

/// Run the full pipeline over one text blob. Malformed lines are dropped
/// through the sink; an empty result (no valid lines) is not an error.
pub fn analyze(
    raw_text: &str,
    config: &AnalyzerConfig,
    diag: &dyn DiagnosticSink,
) -> Result<Vec<ScoredRecord>, AnalyzerError> {
    let records = parse(raw_text, diag);
    let features = generate(records);
    let scored = detect(&features, &config.detector)?;
    info!(records = scored.len(), "pipeline run complete");
    Ok(scored)
}
