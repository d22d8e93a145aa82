//! Structured logging setup and per-stage diagnostics.
//!
//! Stages never touch global logging state directly: they report through an
//! explicit [`DiagnosticSink`] collaborator. [`TracingSink`] forwards to the
//! installed tracing subscriber; [`RecordingSink`] captures events for tests.

mod format;

pub use format::{RunSummary, StructuredLogger};

use std::sync::Mutex;
use tracing::warn;

/// Diagnostics collaborator injected into pipeline stages.
pub trait DiagnosticSink: Send + Sync {
    /// A line was discarded during parsing (non-fatal).
    fn line_dropped(&self, line: &str, reason: &str);
}

/// Forwards diagnostics to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn line_dropped(&self, line: &str, reason: &str) {
        warn!(line, reason, "dropped log line");
    }
}

/// Captures diagnostics in memory; used by tests and callers that surface
/// drop counts themselves.
#[derive(Debug, Default)]
pub struct RecordingSink {
    dropped: Mutex<Vec<DroppedLine>>,
}

#[derive(Debug, Clone)]
pub struct DroppedLine {
    pub line: String,
    pub reason: String,
}

impl RecordingSink {
    pub fn dropped(&self) -> Vec<DroppedLine> {
        self.dropped.lock().expect("lock").clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn line_dropped(&self, line: &str, reason: &str) {
        self.dropped.lock().expect("lock").push(DroppedLine {
            line: line.to_string(),
            reason: reason.to_string(),
        });
    }
}
