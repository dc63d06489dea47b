//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Collector timestamps are in seconds, durations are reported in microseconds
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Duration range (microseconds) used when no call ever returned
pub const DEFAULT_DURATION_RANGE: (f64, f64) = (0.0, 10_000.0);

/// Graph labels longer than this are truncated
pub const MAX_LABEL_LEN: usize = 20;

/// Characters kept from a truncated label (before the "..." suffix)
pub const LABEL_KEEP_LEN: usize = 17;

// Field names for the chain payload (the backend and older dumps disagree)
pub const RECEIVE_FIELD_NAMES: &[&str] = &["receive", "recv", "receiveChains", "receive_chains"];
pub const SEND_FIELD_NAMES: &[&str] = &["send", "sendChains", "send_chains"];
