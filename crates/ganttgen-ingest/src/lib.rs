//! # ganttgen-ingest
//!
//! Spreadsheet-side collaborators for ganttgen:
//! - CSV ingestion producing a typed, ordered `TaskRow` table
//! - The fillable template exporter (CSV and XLSX)
//!
//! Ingestion upholds the calculator's invariants: all-empty rows are
//! dropped before typing, start dates parse from `DD-MM-YYYY` (slash
//! separators are accepted too, matching older template exports), and a
//! row without a valid effort count fails the whole batch with the
//! 1-based data row number attached.
//!
//! ## Example
//!
//! ```rust
//! let data = "\
//! Group,Task_Name,Start_Date,FTE_Days,Completed_FTE_Days,Milestone
//! 1,Analysis,05-01-2026,5,3,
//! ";
//! let rows = ganttgen_ingest::read_tasks(data.as_bytes()).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].fte_days, 5);
//! ```

pub mod template;

use chrono::NaiveDate;
use ganttgen_core::{DataError, TaskRow};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// Column order of the fillable template and of ingested files.
pub const TEMPLATE_COLUMNS: [&str; 6] = [
    "Group",
    "Task_Name",
    "Start_Date",
    "FTE_Days",
    "Completed_FTE_Days",
    "Milestone",
];

/// Ingestion failure
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// A typed-field failure in one data row; the row number is 1-based
    /// and excludes the header.
    #[error("row {row}: {source}")]
    Row { row: usize, source: DataError },
}

/// Untyped spreadsheet record, one per CSV line.
///
/// Everything is read as a string first so that blank-row detection and
/// field-level error reporting happen before any typing.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(rename = "Group", default)]
    group: String,
    #[serde(rename = "Task_Name", default)]
    task_name: String,
    #[serde(rename = "Start_Date", default)]
    start_date: String,
    #[serde(rename = "FTE_Days", default)]
    fte_days: String,
    #[serde(rename = "Completed_FTE_Days", default)]
    completed_fte_days: String,
    #[serde(rename = "Milestone", default)]
    milestone: String,
}

impl RawRecord {
    /// Accidental empty spreadsheet rows are dropped, not errors.
    fn is_blank(&self) -> bool {
        self.group.trim().is_empty()
            && self.task_name.trim().is_empty()
            && self.start_date.trim().is_empty()
            && self.fte_days.trim().is_empty()
            && self.completed_fte_days.trim().is_empty()
            && self.milestone.trim().is_empty()
    }

    fn into_task_row(self) -> Result<TaskRow, DataError> {
        let group = parse_group(self.group.trim())?;
        let start_date = parse_required_date("Start_Date", self.start_date.trim())?;
        let fte_days = parse_effort("FTE_Days", self.fte_days.trim())?;
        if fte_days == 0 {
            return Err(DataError::ZeroEffort);
        }

        let completed = self.completed_fte_days.trim();
        let completed_fte_days = if completed.is_empty() {
            0
        } else {
            parse_number("Completed_FTE_Days", completed)?
        };

        let milestone = self.milestone.trim();
        let milestone = if milestone.is_empty() {
            None
        } else {
            Some(parse_date("Milestone", milestone)?)
        };

        let mut row = TaskRow::new(group, self.task_name.trim(), start_date, fte_days)
            .completed(completed_fte_days);
        row.milestone = milestone;
        Ok(row)
    }
}

fn parse_group(value: &str) -> Result<f64, DataError> {
    if value.is_empty() {
        return Err(DataError::MissingField("Group"));
    }
    let group: f64 = value
        .parse()
        .map_err(|_| DataError::InvalidGroup(value.to_string()))?;
    if !group.is_finite() || group <= 0.0 {
        return Err(DataError::InvalidGroup(value.to_string()));
    }
    Ok(group)
}

fn parse_required_date(field: &'static str, value: &str) -> Result<NaiveDate, DataError> {
    if value.is_empty() {
        return Err(DataError::MissingField(field));
    }
    parse_date(field, value)
}

/// Parse a `DD-MM-YYYY` date, accepting `/` separators as well.
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map_err(|_| DataError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_effort(field: &'static str, value: &str) -> Result<u32, DataError> {
    if value.is_empty() {
        return Err(DataError::MissingField(field));
    }
    parse_number(field, value)
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, DataError> {
    value.parse().map_err(|_| DataError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Read a task table from CSV, in file order.
///
/// Drops all-empty rows, types everything else, and fails on the first
/// invalid row -- a broken upload never yields a partial chart.
pub fn read_tasks<R: Read>(reader: R) -> Result<Vec<TaskRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let row_number = index + 1;
        let record = record?;
        if record.is_blank() {
            tracing::debug!(row = row_number, "dropping empty row");
            continue;
        }
        let row = record
            .into_task_row()
            .map_err(|source| IngestError::Row {
                row: row_number,
                source,
            })?;
        if row.completed_fte_days > row.fte_days {
            // Accepted but worth surfacing: the completed bar will render
            // longer than the planned bar.
            tracing::warn!(
                row = row_number,
                task = %row.task_name,
                completed = row.completed_fte_days,
                planned = row.fte_days,
                "completed effort exceeds planned effort"
            );
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Read a task table from a CSV file on disk.
pub fn read_tasks_file(path: impl AsRef<Path>) -> Result<Vec<TaskRow>, IngestError> {
    let file = File::open(path)?;
    read_tasks(BufReader::new(file))
}
