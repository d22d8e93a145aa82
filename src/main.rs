//! Logsift entrypoint: read a log file, run the batch pipeline, emit one
//! JSON line per scored record on stdout plus a final run summary.
//! Rendering, filtering and dashboards belong to downstream consumers.

use logsift::{
    config::AnalyzerConfig,
    logging::{RunSummary, StructuredLogger, TracingSink},
    pipeline::analyze,
};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_INPUT: &str = "sample_logs.txt";

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config_path = std::env::var("LOGSIFT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.json"));
    let config = AnalyzerConfig::load(&config_path);

    StructuredLogger::init(config.log.json, &config.log.level);

    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_INPUT.to_string());
    info!(input = %input, "logsift starting");

    let raw_text = std::fs::read_to_string(&input)?;
    let scored = analyze(&raw_text, &config, &TracingSink)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in &scored {
        StructuredLogger::emit_json(record, &mut out);
    }

    let summary = RunSummary {
        total_records: scored.len(),
        anomalies: scored.iter().filter(|r| r.is_anomaly).count(),
        contamination: config.detector.contamination,
    };
    StructuredLogger::emit_json(&summary, &mut out);
    info!(
        total = summary.total_records,
        anomalies = summary.anomalies,
        "logsift run complete"
    );

    Ok(())
}
