//! Utility modules for configuration, error handling, and time formatting.

pub mod config;
pub mod error;
pub mod time;

// Re-export commonly used error types for convenience
pub use error::{OutputError, ParseError};
pub use time::format_timestamp;
