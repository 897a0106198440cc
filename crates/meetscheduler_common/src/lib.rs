// --- File: crates/meetscheduler_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod time; // Timestamp parsing

// Re-export error types and utilities for easier access
pub use error::{config_error, HttpStatusCode, MeetSchedulerError};

// Re-export HTTP utilities for easier access
pub use http::{
    client::client_for_endpoint,
    error_detail,
};

// Re-export logging utilities for easier access
pub use logging::{init_with_file, init_with_level, log_error};

pub use time::{parse_timestamp, TimestampError};

// This crate holds what every other MeetScheduler crate needs: the shared
// error type, logging setup, HTTP client construction and timestamp parsing.
