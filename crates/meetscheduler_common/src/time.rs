//! Timestamp parsing for values coming from the backends.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised timestamp '{0}'")]
pub struct TimestampError(pub String);

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a backend timestamp into an absolute instant.
///
/// Accepts RFC 3339, RFC 3339 without seconds (`2025-06-02T14:00Z`) and naive
/// ISO timestamps. Naive values are taken as UTC, which is what the
/// scheduling backend emits.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let value = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    // chrono's %#z does not take a bare `Z`
    let normalised = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(rest) => format!("{rest}+00:00"),
        None => value.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&normalised, format) {
            return Ok(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed.and_utc());
        }
    }
    Err(TimestampError(raw.to_string()))
}
