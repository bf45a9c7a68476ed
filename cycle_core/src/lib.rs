#![forbid(unsafe_code)]

//! Core domain model and business logic for the Cyclelator system.
//!
//! This crate provides:
//! - Domain types (profiles, cycle records, calendar day statuses)
//! - Cycle length estimation from recorded history
//! - Per-day cycle status projection
//! - Calendar range building and prediction summaries
//! - Persistence and CSV history exchange

pub mod types;
pub mod error;
pub mod dates;
pub mod estimate;
pub mod projection;
pub mod calendar;
pub mod store;
pub mod history;
pub mod config;
pub mod palette;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use estimate::estimate_cycle_length;
pub use projection::cycle_status;
pub use calendar::{build_calendar, cycle_prediction, guest_calendar};
pub use store::{Database, Store};
pub use history::{export_cycles, import_start_dates};
pub use config::Config;
pub use palette::pick_color;
