//! Permissive date-time parsing.
//!
//! Accepts RFC 3339 and RFC 2822 plus a set of common human-written forms
//! (`Dec 15, 2023 10:00AM`, `2000-01-01`, `12/25/2023`, ...). Formats
//! without an offset are taken as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{ErrorKind, ValidationError};

/// Date-time layouts tried in order, all interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %I:%M%p",
    "%B %d, %Y %I:%M %p",
    "%B %d %Y %I:%M%p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M%p",
];

/// Date-only layouts, taken as midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%m/%d/%Y",
];

/// Parse a date-time string in any of the supported layouts.
pub fn parse_time(text: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    let trimmed = text.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(t);
    }

    if let Ok(t) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(t);
    }

    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(t.and_utc().fixed_offset());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            let midnight = d.and_hms_opt(0, 0, 0).unwrap_or_default();
            return Ok(midnight.and_utc().fixed_offset());
        }
    }

    Err(ErrorKind::InvalidData.err().with_value(text))
}
