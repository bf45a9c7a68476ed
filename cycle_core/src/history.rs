//! CSV import and export of cycle history.
//!
//! Export writes a profile's cycle rows to a headered CSV file. Import reads
//! start dates back from any CSV carrying a `start_date` column, skipping
//! malformed rows with a warning rather than failing the batch.

use crate::{CycleRecord, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CSV row format for exported cycle records
#[derive(Debug, Serialize)]
struct ExportRow {
    id: String,
    start_date: String,
    computed_length: Option<u32>,
}

impl From<&CycleRecord> for ExportRow {
    fn from(record: &CycleRecord) -> Self {
        ExportRow {
            id: record.id.to_string(),
            start_date: record.start_date.to_string(),
            computed_length: record.computed_length,
        }
    }
}

/// CSV row format for imported history (extra columns are ignored)
#[derive(Debug, Deserialize)]
struct ImportRow {
    start_date: String,
}

/// Write cycle records to a headered CSV file, returning the row count
pub fn export_cycles(cycles: &[&CycleRecord], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in cycles {
        writer.serialize(ExportRow::from(*record))?;
    }
    writer.flush()?;

    tracing::info!("Exported {} cycle record(s) to {:?}", cycles.len(), path);
    Ok(cycles.len())
}

/// Read start dates from a CSV file's `start_date` column
///
/// Rows that fail to deserialize or parse are skipped with a warning so one
/// bad entry cannot block a bulk import.
pub fn import_start_dates(path: &Path) -> Result<Vec<NaiveDate>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut dates = Vec::new();
    for result in reader.deserialize::<ImportRow>() {
        match result {
            Ok(row) => match row.start_date.trim().parse::<NaiveDate>() {
                Ok(date) => dates.push(date),
                Err(e) => {
                    tracing::warn!("Skipping row with invalid date '{}': {}", row.start_date, e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    tracing::info!("Imported {} start date(s) from {:?}", dates.len(), path);
    Ok(dates)
}
