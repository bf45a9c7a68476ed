//! Core domain types for the Cyclelator system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Profiles and their recorded cycle start dates
//! - Computed per-day calendar statuses
//! - Prediction summaries for the upcoming cycle

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Profile Types
// ============================================================================

/// A tracked user profile
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub nickname: String,
    pub avatar_color: String,
    pub display_order: u32,
    pub manual_cycle_length: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new profile with a fresh id
    pub fn new(nickname: impl Into<String>, avatar_color: impl Into<String>) -> Self {
        Profile {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            avatar_color: avatar_color.into(),
            display_order: 0,
            manual_cycle_length: None,
            created_at: Utc::now(),
        }
    }

    /// Synthetic profile for guest-mode calendars (never persisted)
    pub fn guest() -> Self {
        Profile {
            id: Uuid::nil(),
            nickname: "Guest".into(),
            avatar_color: "#000000".into(),
            display_order: 0,
            manual_cycle_length: None,
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Cycle Record Types
// ============================================================================

/// One recorded period start date belonging to a profile
///
/// `computed_length` is a cached display value (days until the next newer
/// recorded start). The projection core never reads it; it recomputes from
/// raw start dates on every call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CycleRecord {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub start_date: NaiveDate,
    pub computed_length: Option<u32>,
}

impl CycleRecord {
    /// Create a new record for a profile with a fresh id
    pub fn new(profile_id: Uuid, start_date: NaiveDate) -> Self {
        CycleRecord {
            id: Uuid::new_v4(),
            profile_id,
            start_date,
            computed_length: None,
        }
    }
}

// ============================================================================
// Calendar Output Types
// ============================================================================

/// Classification of a single calendar day
///
/// Field names serialize in camelCase to match the calendar wire format
/// consumed by UI clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayStatus {
    pub date: NaiveDate,
    pub is_period_start: bool,
    /// Reserved for multi-day period marking; never set by current policy
    pub is_period_day: bool,
    pub is_ovulation: bool,
    pub is_dangerous: bool,
    pub is_projected: bool,
}

impl CalendarDayStatus {
    /// Status for a day no prediction can anchor to (no usable history)
    pub fn unanchored(date: NaiveDate) -> Self {
        CalendarDayStatus {
            date,
            is_period_start: false,
            is_period_day: false,
            is_ovulation: false,
            is_dangerous: false,
            is_projected: true,
        }
    }
}

/// Summary of the upcoming cycle anchored at the most recent recorded start
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclePrediction {
    pub cycle_length: u32,
    pub next_period_start: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub dangerous_start: NaiveDate,
    pub dangerous_end: NaiveDate,
}
