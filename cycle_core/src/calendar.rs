//! Calendar range building and cycle prediction summaries.
//!
//! The builder iterates the projector over an inclusive day range; every day
//! is independent, so the output is just the per-day statuses in ascending
//! order. Guest mode runs the same pipeline against a synthetic profile.

use crate::dates::{add_days, days_inclusive};
use crate::estimate::estimate_cycle_length;
use crate::projection::cycle_status;
use crate::{CalendarDayStatus, CyclePrediction, CycleRecord, Error, Profile, Result};
use chrono::NaiveDate;

/// Build one status per day of the inclusive range `[start, end]`
pub fn build_calendar(
    profile: &Profile,
    cycles: &[CycleRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CalendarDayStatus>> {
    if end < start {
        return Err(Error::Calendar(format!(
            "range end {} precedes start {}",
            end, start
        )));
    }

    let days: Vec<CalendarDayStatus> = days_inclusive(start, end)
        .map(|day| cycle_status(profile, cycles, day))
        .collect();

    tracing::debug!(
        "Built {} calendar day(s) for profile {}",
        days.len(),
        profile.nickname
    );

    Ok(days)
}

/// Build a calendar for an unpersisted guest
///
/// A guest has no manual length and at most one synthetic cycle record, so
/// every anchored day comes out of the standard model.
pub fn guest_calendar(
    start: NaiveDate,
    end: NaiveDate,
    cycle_start: Option<NaiveDate>,
) -> Result<Vec<CalendarDayStatus>> {
    let profile = Profile::guest();
    let cycles: Vec<CycleRecord> = cycle_start
        .map(|d| CycleRecord::new(profile.id, d))
        .into_iter()
        .collect();

    build_calendar(&profile, &cycles, start, end)
}

/// Summarize the cycle anchored at the most recent recorded start
///
/// Returns `None` when there is no history to anchor to.
pub fn cycle_prediction(profile: &Profile, cycles: &[CycleRecord]) -> Option<CyclePrediction> {
    let last_start = cycles.iter().map(|c| c.start_date).max()?;
    let len = estimate_cycle_length(profile, cycles);
    let ovulation = add_days(last_start, len as i64 - 15);

    Some(CyclePrediction {
        cycle_length: len,
        next_period_start: add_days(last_start, len as i64),
        ovulation_date: ovulation,
        dangerous_start: add_days(ovulation, -5),
        dangerous_end: ovulation,
    })
}
