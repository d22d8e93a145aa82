//! Feature generation: stable time sort, inter-record gaps, and trailing
//! one-minute window counts computed in a single pass with a moving start
//! pointer (O(N) amortized, never a per-record rescan).

use super::FeatureVector;
use crate::parser::LogRecord;
use chrono::Duration;
use tracing::info;

/// Trailing window length. A record at time T counts records in [T-60s, T];
/// the boundary record exactly one window back is still in.
const WINDOW_SECS: i64 = 60;

/// Keeps the rolling error rate finite when the event count is zero.
const EPSILON: f64 = 1e-9;

fn encode_level(level: &str) -> u8 {
    match level {
        "INFO" => 0,
        "WARNING" => 1,
        "ERROR" => 2,
        _ => 0,
    }
}

#[derive(Clone, Copy)]
struct WindowFlags {
    is_error: bool,
    is_warning: bool,
    is_failed_login: bool,
}

/// Derive feature vectors from parsed records, sorted ascending by
/// timestamp (stable: ties keep their original relative order). Window
/// counts are causal; a record only ever sees records at or before its
/// own timestamp.
pub fn generate(mut records: Vec<LogRecord>) -> Vec<FeatureVector> {
    if records.is_empty() {
        return Vec::new();
    }

    records.sort_by_key(|r| r.timestamp);

    let timestamps: Vec<_> = records.iter().map(|r| r.timestamp).collect();
    let flags: Vec<WindowFlags> = records
        .iter()
        .map(|r| WindowFlags {
            is_error: r.level == "ERROR",
            is_warning: r.level == "WARNING",
            is_failed_login: r.message.to_lowercase().contains("failed login"),
        })
        .collect();

    let mut out = Vec::with_capacity(records.len());
    let mut start = 0usize;
    let mut errors = 0u32;
    let mut warnings = 0u32;
    let mut events = 0u32;
    let mut failed_logins = 0u32;

    for (i, record) in records.into_iter().enumerate() {
        events += 1;
        if flags[i].is_error {
            errors += 1;
        }
        if flags[i].is_warning {
            warnings += 1;
        }
        if flags[i].is_failed_login {
            failed_logins += 1;
        }

        let cutoff = timestamps[i] - Duration::seconds(WINDOW_SECS);
        while timestamps[start] < cutoff {
            events -= 1;
            if flags[start].is_error {
                errors -= 1;
            }
            if flags[start].is_warning {
                warnings -= 1;
            }
            if flags[start].is_failed_login {
                failed_logins -= 1;
            }
            start += 1;
        }

        let time_gap_seconds = if i == 0 {
            0.0
        } else {
            (timestamps[i] - timestamps[i - 1]).num_seconds() as f64
        };

        out.push(FeatureVector {
            level_encoded: encode_level(&record.level),
            time_gap_seconds,
            error_count_1m: errors,
            warning_count_1m: warnings,
            event_count_1m: events,
            failed_login_count_1m: failed_logins,
            rolling_error_rate: f64::from(errors) / (f64::from(events) + EPSILON),
            message_length: record.message.chars().count(),
            record,
        });
    }

    info!(count = out.len(), "generated feature vectors");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(offset_secs: i64, level: &str, message: &str) -> LogRecord {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let timestamp = base + Duration::seconds(offset_secs);
        LogRecord {
            timestamp,
            level: level.to_string(),
            message: message.to_string(),
            raw_line: format!("{} {} {}", timestamp.format("%Y-%m-%d %H:%M:%S"), level, message),
        }
    }

    #[test]
    fn empty_input_passes_through() {
        assert!(generate(Vec::new()).is_empty());
    }

    #[test]
    fn single_record_counts_itself() {
        let out = generate(vec![record(0, "ERROR", "failed login from 10.0.0.1")]);
        assert_eq!(out.len(), 1);
        let fv = &out[0];
        assert_eq!(fv.time_gap_seconds, 0.0);
        assert_eq!(fv.event_count_1m, 1);
        assert_eq!(fv.error_count_1m, 1);
        assert_eq!(fv.warning_count_1m, 0);
        assert_eq!(fv.failed_login_count_1m, 1);
    }

    #[test]
    fn window_boundary_is_inclusive_sixty_seconds_back() {
        let out = generate(vec![
            record(0, "INFO", "a"),
            record(30, "INFO", "b"),
            record(61, "INFO", "c"),
            record(90, "INFO", "d"),
        ]);
        // At t=90 the window reaches back to t=30 inclusive; t=0 is out.
        assert_eq!(out[3].event_count_1m, 3);
        assert_eq!(out[0].event_count_1m, 1);
        assert_eq!(out[1].event_count_1m, 2);
        assert_eq!(out[2].event_count_1m, 3);
    }

    #[test]
    fn counts_decay_as_the_window_slides() {
        let out = generate(vec![
            record(0, "ERROR", "boom"),
            record(10, "WARNING", "careful"),
            record(120, "INFO", "calm again"),
        ]);
        assert_eq!(out[1].error_count_1m, 1);
        assert_eq!(out[1].warning_count_1m, 1);
        assert_eq!(out[2].error_count_1m, 0);
        assert_eq!(out[2].warning_count_1m, 0);
        assert_eq!(out[2].event_count_1m, 1);
    }

    #[test]
    fn shuffled_input_is_sorted_stably() {
        let shuffled = vec![
            record(50, "INFO", "third"),
            record(0, "INFO", "first"),
            record(20, "INFO", "second"),
        ];
        let out = generate(shuffled);
        let messages: Vec<_> = out.iter().map(|fv| fv.record.message.as_str()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
        assert_eq!(out[1].time_gap_seconds, 20.0);
        assert_eq!(out[2].time_gap_seconds, 30.0);
    }

    #[test]
    fn unknown_level_encodes_to_zero() {
        let out = generate(vec![record(0, "TRACE", "odd level")]);
        assert_eq!(out[0].level_encoded, 0);
        assert_eq!(out[0].error_count_1m, 0);
    }

    #[test]
    fn failed_login_match_is_case_insensitive() {
        let out = generate(vec![
            record(0, "ERROR", "Failed Login for admin"),
            record(1, "ERROR", "disk full"),
        ]);
        assert_eq!(out[0].failed_login_count_1m, 1);
        assert_eq!(out[1].failed_login_count_1m, 1);
    }

    #[test]
    fn rolling_error_rate_tracks_window_counts() {
        let out = generate(vec![
            record(0, "INFO", "start"),
            record(1, "ERROR", "bad"),
        ]);
        let rate = out[1].rolling_error_rate;
        assert!((rate - 0.5).abs() < 1e-6);
    }

    #[test]
    fn message_length_counts_characters() {
        let out = generate(vec![record(0, "INFO", "héllo")]);
        assert_eq!(out[0].message_length, 5);
    }
}
