//! Date-like value with millisecond resolution.
//!
//! # Responsibility
//! - Carry one instant as epoch milliseconds, or an invalid marker.
//! - Convert loose input (strings, numeric timestamps) into an instant.
//!
//! # Invariants
//! - Valid instants stay within +/- 8.64e15 ms of the epoch.
//! - An invalid date never compares equal, not even to another invalid date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::fmt::{Display, Formatter};

/// Largest representable distance from the epoch, in milliseconds.
pub const MAX_TIMESTAMP_MS: i64 = 8_640_000_000_000_000;

const NAIVE_DATE_TIME_FORMATS: &[&str] =
    &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// One instant in time, or the invalid date.
#[derive(Debug, Clone, Copy)]
pub struct DateValue {
    millis: Option<i64>,
}

impl DateValue {
    /// Creates a date from epoch milliseconds.
    ///
    /// Out-of-range input yields the invalid date.
    pub fn from_millis(millis: i64) -> Self {
        if millis.unsigned_abs() > MAX_TIMESTAMP_MS as u64 {
            return Self::invalid();
        }
        Self {
            millis: Some(millis),
        }
    }

    /// Creates a date from a numeric timestamp, truncating fractional millis.
    pub fn from_timestamp(value: f64) -> Self {
        if !value.is_finite() || value.abs() > MAX_TIMESTAMP_MS as f64 {
            return Self::invalid();
        }
        Self::from_millis(value.trunc() as i64)
    }

    /// Current wall clock instant.
    pub fn now() -> Self {
        Self::from_millis(Utc::now().timestamp_millis())
    }

    pub fn invalid() -> Self {
        Self { millis: None }
    }

    /// Parses a date-formatted string.
    ///
    /// Accepts RFC 3339, date-only `YYYY-MM-DD` (UTC midnight) and
    /// offset-less `YYYY-MM-DDTHH:MM[:SS[.fff]]` (read as UTC). Anything else
    /// yields the invalid date.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Self::from_millis(parsed.timestamp_millis());
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return match date.and_hms_opt(0, 0, 0) {
                Some(midnight) => Self::from_millis(midnight.and_utc().timestamp_millis()),
                None => Self::invalid(),
            };
        }
        for format in NAIVE_DATE_TIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Self::from_millis(naive.and_utc().timestamp_millis());
            }
        }
        Self::invalid()
    }

    /// Epoch milliseconds, `None` for the invalid date.
    pub fn millis(&self) -> Option<i64> {
        self.millis
    }

    pub fn is_valid(&self) -> bool {
        self.millis.is_some()
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        self.millis.and_then(DateTime::from_timestamp_millis)
    }

    /// RFC 3339 text with millisecond precision, e.g. `2020-01-01T00:00:00.000Z`.
    pub fn to_rfc3339(&self) -> Option<String> {
        self.to_datetime()
            .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl PartialEq for DateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.millis, other.millis) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_millis(value.timestamp_millis())
    }
}

impl Display for DateValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.to_rfc3339() {
            Some(text) => f.write_str(&text),
            None => f.write_str("Invalid Date"),
        }
    }
}
