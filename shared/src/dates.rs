//! Conversion between stored ISO-8601 timestamps and display strings.
//!
//! Stored dates come from two places: seed imports written by hand or by other
//! tools, and the install/inspect handlers which write [`to_iso`] output. Both
//! are accepted by [`parse_date`]; anything without an offset is taken as UTC.
//! A stored offset is kept, so a date is displayed as it was written.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::protocol::{INSPECTION_INTERVAL_DAYS, NOT_AVAILABLE};

const DISPLAY_FORMAT: &str = "%Y-%m-%d";

const OFFSET_FORMATS: [&str; 2] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unparseable timestamp: {0:?}")]
    Unparseable(String),
}

/// Parse an ISO-8601 timestamp, keeping its offset. Missing timezone
/// information means UTC.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, DateError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt);
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(value, DISPLAY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| DateError::Unparseable(value.to_string()))
}

/// Parse an optional stored field. Absent and empty values are both `None`.
pub fn parse_optional(value: Option<&str>) -> Result<Option<DateTime<FixedOffset>>, DateError> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_date(v).map(Some),
        _ => Ok(None),
    }
}

/// `YYYY-MM-DD` in the timestamp's own offset, or `N/A` when absent
pub fn format_date(value: Option<DateTime<FixedOffset>>) -> String {
    match value {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Storage form of a timestamp
pub fn to_iso(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn next_inspection(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(INSPECTION_INTERVAL_DAYS)
}

/// True only for a present date strictly before `now`, compared as instants
pub fn is_past(value: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) -> bool {
    value.is_some_and(|dt| dt.with_timezone(&Utc) < now)
}
