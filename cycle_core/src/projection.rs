//! Cycle status projection for a single calendar day.
//!
//! Locates the cycle governing a target date (current, future-projected, or
//! historical), determines that cycle's effective length, and classifies the
//! day:
//! - Period start (day one of the governing cycle)
//! - Ovulation day (one-based day `L - 14`)
//! - Dangerous window (the six days ending on ovulation)

use crate::dates::{add_days, day_offset};
use crate::estimate::{estimate_cycle_length, MAX_PLAUSIBLE_CYCLE_DAYS};
use crate::{CalendarDayStatus, CycleRecord, Profile};
use chrono::NaiveDate;

/// Classify one calendar day against a profile's recorded history
///
/// Pure and total: every input combination, including empty history, maps to
/// a defined status. Inputs are never mutated; the record order does not
/// matter.
pub fn cycle_status(
    profile: &Profile,
    cycles: &[CycleRecord],
    target: NaiveDate,
) -> CalendarDayStatus {
    let mut sorted: Vec<&CycleRecord> = cycles.iter().collect();
    sorted.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    let Some(last) = sorted.first() else {
        // No history at all: nothing to anchor a prediction to
        return CalendarDayStatus::unanchored(target);
    };

    // On or after the newest recorded start: anchor there and extrapolate
    if target >= last.start_date {
        let len = estimate_cycle_length(profile, cycles) as i64;
        return project_from(last.start_date, len, target, false);
    }

    // Target precedes the newest record: find the cycle it actually fell in
    let Some(idx) = sorted.iter().position(|c| c.start_date <= target) else {
        // Pre-history: the target predates every recorded start
        return CalendarDayStatus::unanchored(target);
    };
    let historic = sorted[idx];

    match idx.checked_sub(1).map(|i| sorted[i]) {
        Some(successor) => {
            let actual_len = day_offset(historic.start_date, successor.start_date);
            if actual_len > MAX_PLAUSIBLE_CYCLE_DAYS {
                // Too wide to be one real cycle: re-project across the hole
                let len = estimate_cycle_length(profile, cycles) as i64;
                project_from(historic.start_date, len, target, true)
            } else {
                // Bounded by two recorded starts: the observed length governs
                classify_day(target, historic.start_date, actual_len, false)
            }
        }
        None => {
            let len = estimate_cycle_length(profile, cycles) as i64;
            project_from(historic.start_date, len, target, true)
        }
    }
}

/// Extrapolate whole cycles of `len` days forward from `anchor`
///
/// `target` must not precede `anchor`. Cycle index 0 is the cycle whose
/// start was actually recorded; any later index is a future projection.
/// `always_projected` forces the flag for re-projections over data holes.
fn project_from(
    anchor: NaiveDate,
    len: i64,
    target: NaiveDate,
    always_projected: bool,
) -> CalendarDayStatus {
    let elapsed = day_offset(anchor, target);
    let cycle_index = elapsed.div_euclid(len);
    let governing_start = add_days(anchor, cycle_index * len);

    tracing::trace!(
        "Projecting {} from anchor {} (cycle index {})",
        target,
        anchor,
        cycle_index
    );

    classify_day(
        target,
        governing_start,
        len,
        always_projected || cycle_index > 0,
    )
}

/// Classify `target` inside the governing cycle `(cycle_start, length)`
fn classify_day(
    target: NaiveDate,
    cycle_start: NaiveDate,
    length: i64,
    is_projected: bool,
) -> CalendarDayStatus {
    let offset = day_offset(cycle_start, target);

    // Day 1 is the cycle start, so the one-based "day L - 14" sits at
    // zero-based offset L - 15
    let ovulation_offset = length - 15;

    CalendarDayStatus {
        date: target,
        is_period_start: offset == 0,
        is_period_day: false,
        is_ovulation: offset == ovulation_offset,
        is_dangerous: offset >= ovulation_offset - 5 && offset <= ovulation_offset,
        is_projected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn profile() -> Profile {
        Profile::new("test", "#4a90e2")
    }

    fn cycles(dates: &[&str]) -> Vec<CycleRecord> {
        let profile_id = Uuid::new_v4();
        dates
            .iter()
            .map(|d| CycleRecord::new(profile_id, date(d)))
            .collect()
    }

    #[test]
    fn test_empty_history_is_unanchored() {
        let status = cycle_status(&profile(), &[], date("2024-06-15"));

        assert!(status.is_projected);
        assert!(!status.is_period_start);
        assert!(!status.is_period_day);
        assert!(!status.is_ovulation);
        assert!(!status.is_dangerous);
    }

    #[test]
    fn test_recorded_start_is_period_start_and_not_projected() {
        let history = cycles(&["2024-01-01", "2024-01-29", "2024-02-27"]);

        let status = cycle_status(&profile(), &history, date("2024-02-27"));
        assert!(status.is_period_start);
        assert!(!status.is_projected);
    }

    #[test]
    fn test_ovulation_in_current_cycle() {
        // Gaps 28 and 29 estimate to 29; ovulation offset 14 lands on Mar 12
        let history = cycles(&["2024-01-01", "2024-01-29", "2024-02-27"]);

        let status = cycle_status(&profile(), &history, date("2024-03-12"));
        assert!(status.is_ovulation);
        assert!(status.is_dangerous);
        assert!(!status.is_projected);

        let day_after = cycle_status(&profile(), &history, date("2024-03-13"));
        assert!(!day_after.is_ovulation);
        assert!(!day_after.is_dangerous);
    }

    #[test]
    fn test_dangerous_window_boundaries() {
        // Manual length 28: ovulation at offset 13, window offsets 8..=13
        let mut profile = profile();
        profile.manual_cycle_length = Some(28);
        let history = cycles(&["2024-01-01"]);

        let window: Vec<bool> = (7..=14)
            .map(|d| {
                cycle_status(&profile, &history, date("2024-01-01") + chrono::Duration::days(d))
                    .is_dangerous
            })
            .collect();

        assert_eq!(
            window,
            vec![false, true, true, true, true, true, true, false]
        );

        let ovulation = cycle_status(&profile, &history, date("2024-01-14"));
        assert!(ovulation.is_ovulation);
    }

    #[test]
    fn test_one_cycle_ahead_is_projected_period_start() {
        // Single record estimates to 28; offset 28 is day one of cycle index 1
        let history = cycles(&["2024-01-01"]);

        let status = cycle_status(&profile(), &history, date("2024-01-29"));
        assert!(status.is_period_start);
        assert!(status.is_projected);
    }

    #[test]
    fn test_far_future_projection() {
        let history = cycles(&["2024-01-01"]);

        // Three full 28-day cycles out: 2024-01-01 + 84 days
        let status = cycle_status(&profile(), &history, date("2024-03-25"));
        assert!(status.is_period_start);
        assert!(status.is_projected);
    }

    #[test]
    fn test_historical_cycle_uses_actual_length() {
        // The January cycle really ran 31 days (Jan 1 -> Feb 1), so its
        // ovulation sits at offset 16 (Jan 17) regardless of the estimate
        let history = cycles(&["2024-01-01", "2024-02-01", "2024-03-05"]);

        let ovulation = cycle_status(&profile(), &history, date("2024-01-17"));
        assert!(ovulation.is_ovulation);
        assert!(!ovulation.is_projected);

        let start = cycle_status(&profile(), &history, date("2024-01-01"));
        assert!(start.is_period_start);
        assert!(!start.is_projected);
    }

    #[test]
    fn test_outlier_gap_reprojects_instead_of_one_long_cycle() {
        // 91-day hole between records; days inside it are re-projected with
        // the 28-day estimate and always flagged as projected
        let history = cycles(&["2024-01-01", "2024-04-01"]);

        let status = cycle_status(&profile(), &history, date("2024-01-29"));
        assert!(status.is_period_start);
        assert!(status.is_projected);

        // Even inside the first extrapolated cycle the flag stays set
        let early = cycle_status(&profile(), &history, date("2024-01-10"));
        assert!(early.is_projected);
        assert!(!early.is_period_start);
    }

    #[test]
    fn test_pre_history_is_unanchored() {
        let history = cycles(&["2024-03-01", "2024-03-29"]);

        let status = cycle_status(&profile(), &history, date("2024-02-01"));
        assert!(status.is_projected);
        assert!(!status.is_period_start);
        assert!(!status.is_ovulation);
        assert!(!status.is_dangerous);
    }

    #[test]
    fn test_period_day_flag_is_never_set() {
        let history = cycles(&["2024-01-01", "2024-01-29"]);

        for offset in 0..35 {
            let target = date("2024-01-01") + chrono::Duration::days(offset);
            let status = cycle_status(&profile(), &history, target);
            assert!(!status.is_period_day);
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let profile = profile();
        let history = cycles(&["2024-01-01", "2024-01-29", "2024-02-27"]);
        let target = date("2024-03-12");

        let first = cycle_status(&profile, &history, target);
        let second = cycle_status(&profile, &history, target);
        assert_eq!(first, second);
    }

    #[test]
    fn test_record_order_does_not_matter() {
        let forward = cycles(&["2024-01-01", "2024-01-29", "2024-02-27"]);
        let mut shuffled = forward.clone();
        shuffled.swap(0, 2);

        let target = date("2024-03-12");
        let a = cycle_status(&profile(), &forward, target);
        let b = cycle_status(&profile(), &shuffled, target);
        assert_eq!(a, b);
    }
}
