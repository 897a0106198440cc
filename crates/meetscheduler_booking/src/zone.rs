//! The time zone slots are grouped and shown in.

use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Where the viewer's wall clock is.
///
/// `Local` follows the machine's zone; `Named` pins an IANA zone, which keeps
/// tests and remote front ends deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    #[default]
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// `None` selects the local zone; otherwise the name must be a known IANA zone.
    pub fn from_name(name: Option<&str>) -> Result<Self, String> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(DisplayZone::Local),
            Some(name) => name
                .parse::<Tz>()
                .map(DisplayZone::Named)
                .map_err(|_| format!("unknown time zone '{}'", name)),
        }
    }

    /// Calendar day of `instant` on the viewer's wall clock.
    pub fn day_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        match self {
            DisplayZone::Local => instant.with_timezone(&Local).date_naive(),
            DisplayZone::Named(tz) => instant.with_timezone(tz).date_naive(),
        }
    }

    /// e.g. `2:00 PM`
    pub fn format_time(&self, instant: &DateTime<Utc>) -> String {
        const FORMAT: &str = "%-I:%M %p";
        match self {
            DisplayZone::Local => instant.with_timezone(&Local).format(FORMAT).to_string(),
            DisplayZone::Named(tz) => instant.with_timezone(tz).format(FORMAT).to_string(),
        }
    }

    /// e.g. `Monday, June 2`
    pub fn format_day(&self, day: &NaiveDate) -> String {
        day.format("%A, %B %-d").to_string()
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayZone::Local => f.write_str("local time"),
            DisplayZone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}
