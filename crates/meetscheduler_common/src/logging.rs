//! Logging utilities for MeetScheduler.
//!
//! Every crate logs through `tracing`; this module owns subscriber setup so
//! binaries and tests initialise it the same way.

use std::path::Path;
use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level for the
/// `meetscheduler*` targets. `RUST_LOG` directives are still honoured.
///
/// Calling this more than once is harmless; only the first call installs a subscriber.
///
/// # Examples
///
/// ```
/// use meetscheduler_common::logging;
/// use tracing::Level;
///
/// logging::init_with_level(Level::WARN);
/// ```
pub fn init_with_level(level: Level) {
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Initialize the tracing subscriber writing to a daily-rolling file in `dir`.
///
/// The returned guard flushes buffered lines on drop; keep it alive for the
/// lifetime of the program.
pub fn init_with_file(dir: &Path, level: Level) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(dir, "meetscheduler.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer),
        )
        .with(filter_for(level))
        .try_init();

    if result.is_ok() {
        info!("Logging to {} at level: {}", dir.display(), level);
    }
    guard
}

fn filter_for(level: Level) -> EnvFilter {
    let filter = EnvFilter::from_default_env();
    match format!("meetscheduler={}", level).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Log an error with context at the ERROR level.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_with_level(Level::DEBUG);
        init_with_level(Level::WARN);
        log_error("connection reset", "availability lookup");
    }
}
