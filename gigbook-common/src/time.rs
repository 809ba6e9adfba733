//! Timestamp utilities
//!
//! Show start times are naive timestamps interpreted as UTC. They are stored
//! as `YYYY-MM-DD HH:MM:SS` text and displayed as `MM/DD/YYYY, HH:MM`.
//! Sub-second input keeps its fraction in storage (`YYYY-MM-DD HH:MM:SS.sss`),
//! so a stored time never moves relative to the reference instant.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Storage format for show start times; the fraction is omitted when zero
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Display format for show start times on detail views (24-hour clock)
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y, %H:%M";

/// Accepted naive input layouts, tried in order
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Get current UTC instant as a naive timestamp
///
/// Handlers read this once per request and hand it to the pure show logic.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Parse a show start time
///
/// Accepts the storage format, ISO 8601 with a `T` separator (optional
/// fractional seconds), minute precision, and RFC 3339 with an offset (which
/// is converted to UTC). Anything else is rejected; there is no default.
pub fn parse_start_time(raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput("start_time is empty".to_string()));
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_utc());
    }

    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| Error::InvalidInput(format!("Unrecognized start_time: {:?}", raw)))
}

/// Format a start time for storage
pub fn to_storage(time: &NaiveDateTime) -> String {
    time.format(STORAGE_FORMAT).to_string()
}

/// Format a start time for display, e.g. `05/21/2019, 21:30`
pub fn to_display(time: &NaiveDateTime) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}
