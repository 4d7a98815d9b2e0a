//! Field-level conversions
//!
//! Unit conversions and derived fields used by the record mapper.

use chrono::{DateTime, Datelike, Utc};
use report_model::{DurationMillis, KarateMatch, Status, StepMatch};

use crate::{Error, Result};

/// Nanoseconds per millisecond.
pub const NANOS_PER_MILLI: i128 = 1_000_000;

/// Largest distance from the epoch, in milliseconds, of a valid timestamp.
///
/// Matches the range of ECMAScript `Date`, which Karate reports are read by.
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

/// Format epoch milliseconds as an ISO-8601 UTC timestamp with millisecond
/// precision, e.g. `1970-01-01T00:00:00.000Z`.
///
/// Years outside `0..=9999` use the six-digit signed extended form
/// (`+010000-01-01T00:00:00.000Z`). Returns `None` outside
/// [`MAX_EPOCH_MILLIS`] or outside the calendar range `chrono` supports,
/// whichever is narrower.
///
/// `chrono` stops at about year ±262000, so instants between that and the
/// ECMAScript limit of year ±275760 are rejected here.
pub fn iso_timestamp(millis: i64) -> Option<String> {
    if !(-MAX_EPOCH_MILLIS..=MAX_EPOCH_MILLIS).contains(&millis) {
        return None;
    }
    let instant = DateTime::<Utc>::from_timestamp_millis(millis)?;

    let year = instant.year();
    let year = if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        format!("{sign}{:06}", year.unsigned_abs())
    };

    Some(format!("{year}-{}", instant.format("%m-%dT%H:%M:%S%.3fZ")))
}

/// Convert a scenario start time to its ISO-8601 form.
///
/// # Errors
///
/// Returns [`Error::Timestamp`] when the value is not a representable instant.
pub fn start_timestamp(millis: i64, path: &str) -> Result<String> {
    iso_timestamp(millis).ok_or_else(|| Error::timestamp(path, millis))
}

/// Convert a millisecond duration to nanoseconds.
///
/// Integral durations, negative ones included, are scaled exactly;
/// fractional durations are rounded to the nearest nanosecond.
///
/// # Errors
///
/// Returns [`Error::Duration`] for values too large to represent in
/// nanoseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn duration_nanos(duration: &DurationMillis, path: &str) -> Result<i128> {
    let number = duration.as_number();

    if let Some(millis) = number.as_i64() {
        return Ok(i128::from(millis) * NANOS_PER_MILLI);
    }
    if let Some(millis) = number.as_u64() {
        return Ok(i128::from(millis) * NANOS_PER_MILLI);
    }

    let millis = number
        .as_f64()
        .ok_or_else(|| Error::duration(path, format!("unsupported number {number}")))?;

    let nanos = (millis * 1_000_000.0).round();
    if !nanos.is_finite() || nanos.abs() >= i128::MAX as f64 {
        return Err(Error::duration(path, format!("duration {millis} ms out of range")));
    }
    Ok(nanos as i128)
}

/// Step status from the source failure flag.
pub fn step_status(failed: bool) -> Status {
    Status::from_failed(failed)
}

/// Target match for a source step.
///
/// A present match is copied as-is, including a `null` or empty location;
/// only a missing match falls back to `"unknown"`.
pub fn match_location(step_match: Option<&KarateMatch>) -> StepMatch {
    match step_match {
        Some(found) => StepMatch {
            location: found.location.clone(),
        },
        None => StepMatch::unknown(),
    }
}
