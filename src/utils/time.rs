//! Timestamp formatting for call listings.

use chrono::{DateTime, Utc};

/// Format a collector timestamp (seconds since the epoch) as `H:MM:SS.mmm`
///
/// Sub-millisecond precision is truncated. Timestamps that cannot be
/// represented render as `-`.
pub fn format_timestamp(timestamp: f64) -> String {
    if !timestamp.is_finite() {
        return "-".to_string();
    }

    let millis = (timestamp * 1000.0).floor() as i64;
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(time) => time.format("%-H:%M:%S%.3f").to_string(),
        None => "-".to_string(),
    }
}
