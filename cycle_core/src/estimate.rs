//! Cycle length estimation from recorded history.
//!
//! Estimation rules:
//! 1. A manual override on the profile wins unconditionally
//! 2. Otherwise average the most recent valid inter-start gaps (up to 3)
//! 3. Gaps over 60 days are presumed missed entries and discarded
//! 4. With no usable gaps, fall back to the 28-day standard model

use crate::dates::days_between;
use crate::{CycleRecord, Profile};

/// Inter-start gaps longer than this reflect missed entries, not real cycles
pub const MAX_PLAUSIBLE_CYCLE_DAYS: i64 = 60;

/// Standard-model cycle length used when history cannot support an estimate
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// How many of the most recent valid gaps enter the average
const AVERAGING_WINDOW: usize = 3;

/// Estimate a representative cycle length in days (always ≥ 1)
///
/// Pure function of the profile's manual override and the raw start dates;
/// `computed_length` caches on the records are ignored.
pub fn estimate_cycle_length(profile: &Profile, cycles: &[CycleRecord]) -> u32 {
    // Manual override has absolute priority, even with zero history
    if let Some(manual) = profile.manual_cycle_length {
        if manual > 0 {
            tracing::debug!(
                "Using manual cycle length {} for profile {}",
                manual,
                profile.nickname
            );
            return manual;
        }
    }

    let gaps = recent_valid_gaps(cycles);

    if gaps.is_empty() {
        tracing::debug!("No usable inter-start gaps, using standard model");
        return DEFAULT_CYCLE_LENGTH;
    }

    let take = gaps.len().min(AVERAGING_WINDOW);
    let sum: i64 = gaps[..take].iter().sum();
    let mean = (sum as f64 / take as f64).round() as u32;

    tracing::debug!("Estimated cycle length {} from {} gap(s)", mean, take);

    // Duplicate start dates can average to zero; a cycle is at least one day
    mean.max(1)
}

/// Inter-start gaps in descending recency order, outliers removed
///
/// Each gap is the distance from a record to the next newer one. Gaps over
/// [`MAX_PLAUSIBLE_CYCLE_DAYS`] are dropped so they cannot pollute the
/// average.
fn recent_valid_gaps(cycles: &[CycleRecord]) -> Vec<i64> {
    let mut sorted: Vec<&CycleRecord> = cycles.iter().collect();
    sorted.sort_by(|a, b| b.start_date.cmp(&a.start_date));

    sorted
        .windows(2)
        .filter_map(|pair| {
            let (newer, older) = (pair[0], pair[1]);
            let gap = days_between(older.start_date, newer.start_date);
            if gap <= MAX_PLAUSIBLE_CYCLE_DAYS {
                Some(gap)
            } else {
                tracing::debug!("Discarding {}-day gap as a missed-entry outlier", gap);
                None
            }
        })
        .collect()
}
