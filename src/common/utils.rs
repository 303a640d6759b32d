//! Shared helpers for day-boundary arithmetic and temperature interpolation.

use chrono::{DateTime, Datelike, Local, Utc};

use crate::common::constants::SECONDS_PER_DAY;

/// Unix timestamp in whole seconds.
pub type Timestamp = i64;

/// Start of the calendar day containing `now`, where days begin at `offset`
/// seconds past UTC midnight.
pub fn day_start(now: Timestamp, offset: i64) -> Timestamp {
    now - (now - offset).rem_euclid(SECONDS_PER_DAY)
}

/// Start of the calendar day following the one containing `now`.
pub fn tomorrow(now: Timestamp, offset: i64) -> Timestamp {
    day_start(now, offset) + SECONDS_PER_DAY
}

/// Year and zero-based day-of-year of the UTC date at `midnight`.
pub fn year_and_ordinal(midnight: Timestamp) -> (i32, u32) {
    let date = DateTime::<Utc>::from_timestamp(midnight, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .date_naive();
    (date.year(), date.ordinal0())
}

/// Linear interpolation of a temperature across `[start, stop]`.
///
/// The position is clamped to `[0, 1]` and the result truncated toward the
/// start value, so successive calls inside a window never overshoot.
pub fn interpolate_temperature(
    now: Timestamp,
    start: Timestamp,
    stop: Timestamp,
    temp_start: u32,
    temp_stop: u32,
) -> u32 {
    if start == stop {
        return temp_stop;
    }
    let position = ((now - start) as f64 / (stop - start) as f64).clamp(0.0, 1.0);
    let delta = (temp_stop as f64 - temp_start as f64) * position;
    (temp_start as i64 + delta as i64) as u32
}

/// Format a timestamp as local wall-clock `HH:MM`.
pub fn format_clock(time: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp(time, 0)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
