//! Day-granularity date arithmetic.
//!
//! All cycle math runs on whole calendar days (`chrono::NaiveDate`, UTC
//! interpretation). Time-of-day never enters the picture.

use chrono::{Duration, NaiveDate};

/// Absolute difference in whole calendar days between two dates
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// Signed day offset from `start` to `target` (0 when equal, negative when
/// `target` precedes `start`)
pub fn day_offset(start: NaiveDate, target: NaiveDate) -> i64 {
    (target - start).num_days()
}

/// Shift a date by a signed number of days
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Iterate every day of the inclusive range `[start, end]` in ascending order
///
/// Yields nothing when `end < start`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}
