//! Timestamp helpers.
//!
//! Timestamps travel as RFC 3339 strings. Parsing also accepts naive ISO-8601
//! (no offset), which is read as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// The current instant as an RFC 3339 string with microsecond precision.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Formats an instant the way every timestamp in this crate is written.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses an RFC 3339 or naive ISO-8601 timestamp. Returns `None` when the
/// value is neither.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
