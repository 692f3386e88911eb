//! Time and timestamp helpers.

use chrono::{DateTime, ParseError, Utc};

/// UTC timestamp carried by value envelopes and events.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an RFC 3339 string (any offset) into a UTC timestamp.
///
/// # Errors
///
/// Returns the chrono parse error for malformed input.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, ParseError> {
    DateTime::parse_from_rfc3339(value).map(|ts| ts.to_utc())
}
