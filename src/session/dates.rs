//! Date label conversions and the fetch-window policy
//!
//! Labels use the `DD-MM-YYYY` form the header shows. The un-suffixed
//! functions work in the host's local time zone; the `_in` variants take an
//! explicit zone.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::fmt::Display;

use crate::common::errors::{AppError, Result};

/// Format of the last-update label
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Largest window, in days, a single fetch may request
pub const MAX_FETCH_DAYS: i64 = 1600;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Parse a `DD-MM-YYYY` label into the unix timestamp of local midnight
pub fn date_to_timestamp(label: &str) -> Result<i64> {
    date_to_timestamp_in(label, &Local)
}

/// Parse a `DD-MM-YYYY` label into the unix timestamp of midnight in `tz`
pub fn date_to_timestamp_in<Tz: TimeZone>(label: &str, tz: &Tz) -> Result<i64> {
    let date = NaiveDate::parse_from_str(label.trim(), DATE_FORMAT)
        .map_err(|e| AppError::InvalidDate(format!("{:?}: {}", label, e)))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::InvalidDate(format!("{:?}: no midnight", label)))?;

    // A DST gap at midnight has no exact local time; take the first instant of the day.
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| AppError::InvalidDate(format!("{:?}: not representable", label)))
}

/// Format a unix timestamp as a local `DD-MM-YYYY` label
pub fn timestamp_to_date(timestamp: i64) -> Option<String> {
    timestamp_to_date_in(timestamp, &Local)
}

/// Format a unix timestamp as a `DD-MM-YYYY` label in `tz`
pub fn timestamp_to_date_in<Tz>(timestamp: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(timestamp, 0)
        .map(|utc| utc.with_timezone(tz).format(DATE_FORMAT).to_string())
}

/// Whole days elapsed between `timestamp` and `now`, floored
pub fn days_difference(timestamp: i64, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = now.timestamp_millis() - timestamp.saturating_mul(1000);
    elapsed_ms.div_euclid(MILLIS_PER_DAY)
}

/// Whole days elapsed since `timestamp`
pub fn days_since(timestamp: i64) -> i64 {
    days_difference(timestamp, Utc::now())
}

/// Number of days to ask the backend for
///
/// `elapsed` is `None` when the last update is unknown (empty table). Any
/// unknown window, any window past `ceiling`, and every all-time request
/// is capped at `ceiling`.
pub fn requested_days(elapsed: Option<i64>, all_time: bool, ceiling: i64) -> i64 {
    match elapsed {
        Some(days) if !all_time && days <= ceiling => days.max(0),
        _ => ceiling,
    }
}
