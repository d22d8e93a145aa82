//! Strict log line parsing: `YYYY-MM-DD HH:MM:SS LEVEL message`.
//! Lines that fail the grammar or carry an invalid calendar timestamp are
//! dropped and reported through the diagnostic sink; parsing never fails.

use crate::logging::DiagnosticSink;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LINE_GRAMMAR: OnceLock<Regex> = OnceLock::new();

fn line_grammar() -> &'static Regex {
    LINE_GRAMMAR.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s+([A-Z]+)(?:\s+(.*))?$")
            .expect("line grammar regex")
    })
}

/// One parsed log line. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Second-resolution event time.
    pub timestamp: NaiveDateTime,
    /// Severity token as written (open set; INFO/WARNING/ERROR are known).
    pub level: String,
    /// Free text after the level (may be empty).
    pub message: String,
    /// Original line, preserved for display.
    pub raw_line: String,
}

/// Parse a raw text blob into records, one per valid line.
///
/// No ordering is imposed here; the feature stage sorts. Empty input (or
/// input with no valid lines) yields an empty vector, which downstream
/// stages pass through without failing.
pub fn parse(raw_text: &str, diag: &dyn DiagnosticSink) -> Vec<LogRecord> {
    let grammar = line_grammar();
    let mut records = Vec::new();

    for line in raw_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = grammar.captures(line) else {
            diag.line_dropped(line, "line did not match expected format");
            continue;
        };

        let timestamp_str = &caps[1];
        match NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT) {
            Ok(timestamp) => records.push(LogRecord {
                timestamp,
                level: caps[2].to_string(),
                message: caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string(),
                raw_line: line.to_string(),
            }),
            Err(e) => {
                diag.line_dropped(line, &format!("invalid timestamp: {e}"));
            }
        }
    }

    info!(count = records.len(), "parsed log lines");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RecordingSink;

    #[test]
    fn parses_exact_grammar() {
        let sink = RecordingSink::default();
        let records = parse("2024-01-01 00:00:00 INFO service started", &sink);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, "INFO");
        assert_eq!(records[0].message, "service started");
        assert_eq!(records[0].raw_line, "2024-01-01 00:00:00 INFO service started");
        assert_eq!(
            records[0].timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-01 00:00:00"
        );
    }

    #[test]
    fn empty_message_is_allowed() {
        let sink = RecordingSink::default();
        let records = parse("2024-01-01 00:00:00 INFO", &sink);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "");
    }

    #[test]
    fn invalid_calendar_date_is_dropped() {
        let sink = RecordingSink::default();
        let records = parse("2024-13-01 00:00:00 INFO bad month", &sink);
        assert!(records.is_empty());
        assert_eq!(sink.dropped().len(), 1);
    }

    #[test]
    fn malformed_lines_are_dropped_not_fatal() {
        let sink = RecordingSink::default();
        let text = "\
2024-01-01 00:00:00 INFO ok
no timestamp here
2024-01-01 00:00:01 lowercase level
2024-01-01 00:00:02 ERROR still ok
";
        let records = parse(text, &sink);
        assert_eq!(records.len(), 2);
        assert_eq!(sink.dropped().len(), 2);
    }

    #[test]
    fn blank_lines_are_skipped_silently() {
        let sink = RecordingSink::default();
        let records = parse("\n\n   \n", &sink);
        assert!(records.is_empty());
        assert!(sink.dropped().is_empty());
    }
}
