//! Time utilities: parsing timestamps coming from the stores, formatting hours.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, Timelike};

const TIMESTAMP_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a stored timestamp (space or `T` separated, optional fraction)
/// and truncate it to whole seconds.
pub fn parse_timestamp(s: &str) -> AppResult<NaiveDateTime> {
    let trimmed = s.trim();

    TIMESTAMP_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
        .map(truncate_to_seconds)
        .ok_or_else(|| AppError::InvalidTimestamp(s.to_string()))
}

pub fn truncate_to_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Hours with two decimals, e.g. `8.00`.
pub fn format_hours(hours: f64) -> String {
    format!("{:.2}", hours)
}

/// Hours as `08h 30m`, rounded to the minute.
pub fn hours2readable(hours: f64) -> String {
    let mins = (hours * 60.0).round() as i64;
    let abs_m = mins.abs();
    let sign = if mins < 0 { "-" } else { "" };
    format!("{}{:02}h {:02}m", sign, abs_m / 60, abs_m % 60)
}
