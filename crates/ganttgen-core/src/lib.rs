//! # ganttgen-core
//!
//! Core domain model and schedule calculator for ganttgen.
//!
//! This crate provides:
//! - Domain types: `TaskRow`, `TaskBar`, `ColorMap`
//! - The business-day calendar (`BusinessCalendar`)
//! - The schedule calculator (`compute`) that turns effort-day rows into
//!   drawable bar geometry
//! - Error types (`DataError`, `ConfigError`)
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ganttgen_core::{compute, ColorMap, TaskRow};
//!
//! let rows = vec![
//!     TaskRow::new(1.0, "Analysis", NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), 5)
//!         .completed(3),
//! ];
//! let colors = ColorMap::from_palette(rows.iter().map(|r| r.group_key()));
//! let bars = compute(&rows, &colors).unwrap();
//! assert_eq!(bars[0].planned_length_days, 5);
//! ```

pub mod calendar;
pub mod schedule;

pub use calendar::BusinessCalendar;
pub use schedule::{compute, sort_by_group_desc};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Integer group key used for ordering and color assignment.
///
/// Sub-group values such as `3.1` and `3.2` share the parent key `3`.
pub type GroupKey = u32;

// ============================================================================
// TaskRow
// ============================================================================

/// One row of the uploaded task table.
///
/// Effort is counted in business days (Mon-Fri); calendar spans are derived
/// by the schedule calculator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    /// Positive group number; the fractional part is a sub-group suffix
    /// (e.g. `3.1`), the integer part selects the color.
    pub group: f64,
    /// Display label (uniqueness not required).
    pub task_name: String,
    /// First day of planned work.
    pub start_date: NaiveDate,
    /// Total planned effort in business days, at least 1.
    pub fte_days: u32,
    /// Effort completed so far in business days. May exceed `fte_days`
    /// when the source data is inconsistent; not clamped.
    pub completed_fte_days: u32,
    /// Optional milestone marker date.
    pub milestone: Option<NaiveDate>,
}

impl TaskRow {
    /// Create a row with no completed effort and no milestone.
    pub fn new(
        group: f64,
        task_name: impl Into<String>,
        start_date: NaiveDate,
        fte_days: u32,
    ) -> Self {
        Self {
            group,
            task_name: task_name.into(),
            start_date,
            fte_days,
            completed_fte_days: 0,
            milestone: None,
        }
    }

    /// Set the completed effort-days
    pub fn completed(mut self, fte_days: u32) -> Self {
        self.completed_fte_days = fte_days;
        self
    }

    /// Set the milestone date
    pub fn milestone(mut self, date: NaiveDate) -> Self {
        self.milestone = Some(date);
        self
    }

    /// The integer color-group key (`floor(group)`).
    pub fn group_key(&self) -> GroupKey {
        self.group.floor() as GroupKey
    }
}

// ============================================================================
// TaskBar
// ============================================================================

/// Computed bar geometry for one task, ready for rendering.
///
/// Lengths are inclusive calendar-day spans measured from `start_date`;
/// weekends inside a span are drawn even though they carry no effort.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskBar {
    /// Display label, copied from the input row.
    pub task_name: String,
    /// First drawn day of the bar.
    pub start_date: NaiveDate,
    /// Resolved group color (hex string).
    pub color: String,
    /// Calendar days covered by the planned (half-opacity) segment.
    pub planned_length_days: i64,
    /// Calendar days covered by the completed (full-opacity) overlay.
    /// Zero means no progress segment is drawn.
    pub completed_length_days: i64,
    /// Optional milestone marker date, passed through unchanged.
    pub milestone: Option<NaiveDate>,
}

impl TaskBar {
    /// Last calendar day covered by the planned segment.
    pub fn planned_end(&self) -> NaiveDate {
        self.start_date + chrono::Duration::days(self.planned_length_days - 1)
    }

    /// Last calendar day covered by the completed segment, if any.
    pub fn completed_end(&self) -> Option<NaiveDate> {
        if self.completed_length_days == 0 {
            None
        } else {
            Some(self.start_date + chrono::Duration::days(self.completed_length_days - 1))
        }
    }
}

// ============================================================================
// ColorMap
// ============================================================================

/// Mapping from integer group key to a hex color string.
///
/// Every distinct group in a task table must have an entry before the
/// calculator runs; a missing entry is a hard [`ConfigError`], never a
/// silent default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMap {
    colors: BTreeMap<GroupKey, String>,
}

/// Default palette, assigned cyclically when no explicit colors are given.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#F991B4", "#FFB379", "#0EC3EB", "#6CF2EC", "#005F78", "#00ADB2", "#BABAFF", "#8080ff",
];

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map covering `groups` with the default palette, cycling
    /// when there are more groups than palette entries.
    pub fn from_palette(groups: impl IntoIterator<Item = GroupKey>) -> Self {
        let distinct: std::collections::BTreeSet<GroupKey> = groups.into_iter().collect();
        let mut map = Self::new();
        for (i, group) in distinct.into_iter().enumerate() {
            map.insert(group, DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()]);
        }
        map
    }

    /// Insert or replace the color for a group
    pub fn insert(&mut self, group: GroupKey, color: impl Into<String>) {
        self.colors.insert(group, color.into());
    }

    /// Set a color (builder pattern)
    pub fn with_color(mut self, group: GroupKey, color: impl Into<String>) -> Self {
        self.insert(group, color);
        self
    }

    /// Look up the color for a group
    pub fn get(&self, group: GroupKey) -> Option<&str> {
        self.colors.get(&group).map(String::as_str)
    }

    /// Look up the color for a group, failing with a typed error when absent
    pub fn resolve(&self, group: GroupKey) -> Result<&str, ConfigError> {
        self.get(group).ok_or(ConfigError::MissingColor(group))
    }

    /// Check that every distinct group in `rows` has a color entry.
    pub fn validate_for(&self, rows: &[TaskRow]) -> Result<(), ConfigError> {
        for row in rows {
            self.resolve(row.group_key())?;
        }
        Ok(())
    }

    /// Iterate over `(group, color)` entries in ascending group order
    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, &str)> {
        self.colors.iter().map(|(g, c)| (*g, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// A row reaching the calculator with a missing or unparseable required
/// field. Aborts the whole batch; there is no partial chart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("unparseable date '{value}' in field '{field}' (expected DD-MM-YYYY)")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid number '{value}' in field '{field}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("FTE_Days must be at least 1")]
    ZeroEffort,

    #[error("invalid group '{0}': must be a positive number")]
    InvalidGroup(String),
}

/// A group in the task table with no corresponding color entry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no color defined for group {0}")]
    MissingColor(GroupKey),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn task_row_builder() {
        let row = TaskRow::new(3.1, "WP1a", date(2026, 1, 5), 20)
            .completed(15)
            .milestone(date(2026, 2, 27));

        assert_eq!(row.group, 3.1);
        assert_eq!(row.task_name, "WP1a");
        assert_eq!(row.fte_days, 20);
        assert_eq!(row.completed_fte_days, 15);
        assert_eq!(row.milestone, Some(date(2026, 2, 27)));
    }

    #[test]
    fn group_key_floors_subgroups() {
        assert_eq!(TaskRow::new(3.2, "b", date(2026, 1, 5), 1).group_key(), 3);
        assert_eq!(TaskRow::new(3.0, "a", date(2026, 1, 5), 1).group_key(), 3);
        assert_eq!(TaskRow::new(1.9, "c", date(2026, 1, 5), 1).group_key(), 1);
    }

    #[test]
    fn task_bar_span_endpoints() {
        let bar = TaskBar {
            task_name: "A".into(),
            start_date: date(2026, 1, 5),
            color: "#F991B4".into(),
            planned_length_days: 5,
            completed_length_days: 3,
            milestone: None,
        };

        assert_eq!(bar.planned_end(), date(2026, 1, 9));
        assert_eq!(bar.completed_end(), Some(date(2026, 1, 7)));
    }

    #[test]
    fn task_bar_no_completed_segment() {
        let bar = TaskBar {
            task_name: "A".into(),
            start_date: date(2026, 1, 5),
            color: "#F991B4".into(),
            planned_length_days: 5,
            completed_length_days: 0,
            milestone: None,
        };

        assert_eq!(bar.completed_end(), None);
    }

    #[test]
    fn color_map_resolve_present() {
        let colors = ColorMap::new().with_color(3, "#0EC3EB");
        assert_eq!(colors.resolve(3), Ok("#0EC3EB"));
    }

    #[test]
    fn color_map_resolve_missing_is_config_error() {
        let colors = ColorMap::new().with_color(1, "#F991B4");
        assert_eq!(colors.resolve(3), Err(ConfigError::MissingColor(3)));
    }

    #[test]
    fn color_map_from_palette_cycles() {
        // 10 groups against the 8-color palette: 9 and 10 wrap around
        let colors = ColorMap::from_palette(1..=10);
        assert_eq!(colors.len(), 10);
        assert_eq!(colors.get(1), Some(DEFAULT_PALETTE[0]));
        assert_eq!(colors.get(8), Some(DEFAULT_PALETTE[7]));
        assert_eq!(colors.get(9), Some(DEFAULT_PALETTE[0]));
        assert_eq!(colors.get(10), Some(DEFAULT_PALETTE[1]));
    }

    #[test]
    fn color_map_from_palette_dedupes_groups() {
        let colors = ColorMap::from_palette([3, 3, 1, 3, 1].into_iter());
        assert_eq!(colors.len(), 2);
        assert_eq!(colors.get(1), Some(DEFAULT_PALETTE[0]));
        assert_eq!(colors.get(3), Some(DEFAULT_PALETTE[1]));
    }

    #[test]
    fn color_map_validate_for_reports_first_missing_group() {
        let rows = vec![
            TaskRow::new(1.0, "a", date(2026, 1, 5), 1),
            TaskRow::new(3.2, "b", date(2026, 1, 5), 1),
        ];
        let colors = ColorMap::new().with_color(1, "#F991B4");

        assert_eq!(colors.validate_for(&rows), Err(ConfigError::MissingColor(3)));
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::MissingColor(4);
        assert_eq!(err.to_string(), "no color defined for group 4");
    }

    #[test]
    fn data_error_display() {
        let err = DataError::InvalidDate {
            field: "Start_Date",
            value: "2026-31-01".into(),
        };
        assert_eq!(
            err.to_string(),
            "unparseable date '2026-31-01' in field 'Start_Date' (expected DD-MM-YYYY)"
        );
    }
}
