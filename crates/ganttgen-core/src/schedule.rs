//! The schedule calculator.
//!
//! A pure transformation from `TaskRow` + `ColorMap` to an ordered sequence
//! of `TaskBar`. Each row yields a planned span covering its effort-days on
//! the business calendar and a completed overlay covering the effort done so
//! far. The pipeline is three composable stages: the ingest side drops
//! all-empty rows, [`sort_by_group_desc`] orders the table, and [`compute`]
//! maps rows to bars preserving that order.

use crate::calendar::BusinessCalendar;
use crate::{ColorMap, ConfigError, TaskBar, TaskRow};
use std::cmp::Ordering;

/// Sort rows by group number, descending, keeping the original order of
/// equal groups. Stacked charts draw the first bar at the top, so a
/// descending table renders groups top-to-bottom as entered.
pub fn sort_by_group_desc(rows: &mut [TaskRow]) {
    rows.sort_by(|a, b| b.group.partial_cmp(&a.group).unwrap_or(Ordering::Equal));
}

/// Transform a task table into drawable bar geometry.
///
/// Output order is exactly the input order; callers sort beforehand. Fails
/// with [`ConfigError`] when any row's integer group has no color entry --
/// colors are never defaulted here.
pub fn compute(rows: &[TaskRow], colors: &ColorMap) -> Result<Vec<TaskBar>, ConfigError> {
    let calendar = BusinessCalendar::weekdays();
    rows.iter()
        .map(|row| compute_row(row, colors, &calendar))
        .collect()
}

fn compute_row(
    row: &TaskRow,
    colors: &ColorMap,
    calendar: &BusinessCalendar,
) -> Result<TaskBar, ConfigError> {
    let color = colors.resolve(row.group_key())?.to_string();

    let start = row.start_date;
    let planned_end = calendar.advance(start, row.fte_days);
    // Inclusive calendar span: weekends inside the span are drawn even
    // though they carry no effort.
    let planned_length_days = (planned_end - start).num_days() + 1;

    let completed_length_days = if row.completed_fte_days == 0 {
        0
    } else {
        let completed_end = calendar.advance(start, row.completed_fte_days);
        (completed_end - start).num_days() + 1
    };

    Ok(TaskBar {
        task_name: row.task_name.clone(),
        start_date: start,
        color,
        planned_length_days,
        completed_length_days,
        milestone: row.milestone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn palette_for(rows: &[TaskRow]) -> ColorMap {
        ColorMap::from_palette(rows.iter().map(TaskRow::group_key))
    }

    #[test]
    fn single_effort_day_on_business_day_spans_one_day() {
        let rows = vec![TaskRow::new(1.0, "a", date(2026, 1, 5), 1)];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        assert_eq!(bars[0].planned_length_days, 1);
    }

    #[test]
    fn no_completed_effort_means_no_progress_segment() {
        let rows = vec![TaskRow::new(1.0, "a", date(2026, 1, 5), 5)];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        assert_eq!(bars[0].completed_length_days, 0);
        assert_eq!(bars[0].completed_end(), None);
    }

    #[test]
    fn friday_start_two_effort_days_spans_the_weekend() {
        // 2026-01-09 is a Friday; the second effort-day lands on Monday,
        // so the drawn span is Fri, Sat, Sun, Mon = 4 calendar days.
        let rows = vec![TaskRow::new(1.0, "a", date(2026, 1, 9), 2)];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        assert_eq!(bars[0].planned_end(), date(2026, 1, 12));
        assert_eq!(bars[0].planned_length_days, 4);
    }

    #[test]
    fn weekend_start_rolls_forward_before_counting() {
        // Saturday 2026-01-10 rolls to Monday; one effort-day ends Monday.
        // The span is still measured from the original start date.
        let rows = vec![TaskRow::new(1.0, "a", date(2026, 1, 10), 1)];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        assert_eq!(bars[0].start_date, date(2026, 1, 10));
        assert_eq!(bars[0].planned_end(), date(2026, 1, 12));
        assert_eq!(bars[0].planned_length_days, 3);
    }

    #[test]
    fn output_preserves_input_order() {
        let rows = vec![
            TaskRow::new(3.0, "top", date(2026, 1, 5), 1),
            TaskRow::new(2.0, "middle", date(2026, 1, 5), 1),
            TaskRow::new(1.0, "bottom", date(2026, 1, 5), 1),
        ];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        let names: Vec<&str> = bars.iter().map(|b| b.task_name.as_str()).collect();
        assert_eq!(names, vec!["top", "middle", "bottom"]);
    }

    #[test]
    fn sort_by_group_desc_orders_table() {
        let mut rows = vec![
            TaskRow::new(1.0, "a", date(2026, 1, 5), 1),
            TaskRow::new(3.1, "c1", date(2026, 1, 5), 1),
            TaskRow::new(2.0, "b", date(2026, 1, 5), 1),
            TaskRow::new(3.2, "c2", date(2026, 1, 5), 1),
        ];
        sort_by_group_desc(&mut rows);

        let names: Vec<&str> = rows.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["c2", "c1", "b", "a"]);
    }

    #[test]
    fn sort_is_stable_for_equal_groups() {
        let mut rows = vec![
            TaskRow::new(2.0, "first", date(2026, 1, 5), 1),
            TaskRow::new(2.0, "second", date(2026, 1, 5), 1),
            TaskRow::new(5.0, "head", date(2026, 1, 5), 1),
        ];
        sort_by_group_desc(&mut rows);

        let names: Vec<&str> = rows.iter().map(|r| r.task_name.as_str()).collect();
        assert_eq!(names, vec!["head", "first", "second"]);
    }

    #[test]
    fn subgroup_resolves_parent_color() {
        let rows = vec![TaskRow::new(3.2, "sub", date(2026, 1, 5), 1)];
        let colors = ColorMap::new().with_color(3, "#0EC3EB");
        let bars = compute(&rows, &colors).unwrap();

        assert_eq!(bars[0].color, "#0EC3EB");
    }

    #[test]
    fn missing_group_color_fails_the_batch() {
        let rows = vec![
            TaskRow::new(1.0, "a", date(2026, 1, 5), 1),
            TaskRow::new(3.2, "b", date(2026, 1, 5), 1),
        ];
        let colors = ColorMap::new().with_color(1, "#F991B4");

        assert_eq!(compute(&rows, &colors), Err(ConfigError::MissingColor(3)));
    }

    #[test]
    fn end_to_end_monday_week() {
        // Monday 2026-01-05, 5 effort-days planned, 3 done, no milestone.
        let rows = vec![TaskRow::new(1.0, "A", date(2026, 1, 5), 5).completed(3)];
        let colors = ColorMap::new().with_color(1, "#F991B4");
        let bars = compute(&rows, &colors).unwrap();

        assert_eq!(
            bars[0],
            TaskBar {
                task_name: "A".into(),
                start_date: date(2026, 1, 5),
                color: "#F991B4".into(),
                planned_length_days: 5,
                completed_length_days: 3,
                milestone: None,
            }
        );
    }

    #[test]
    fn overrun_progress_is_not_clamped() {
        // Completed beyond planned draws a longer completed bar; the
        // calculator accepts the inconsistency rather than clamping.
        let rows = vec![TaskRow::new(1.0, "a", date(2026, 1, 5), 3).completed(8)];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        assert!(bars[0].completed_length_days > bars[0].planned_length_days);
        assert_eq!(bars[0].planned_length_days, 3);
        assert_eq!(bars[0].completed_length_days, 10); // 8 effort-days across one weekend
    }

    #[test]
    fn planned_covers_completed_for_consistent_input() {
        for completed in 0..=5 {
            let rows = vec![TaskRow::new(1.0, "a", date(2026, 1, 7), 5).completed(completed)];
            let bars = compute(&rows, &palette_for(&rows)).unwrap();
            assert!(bars[0].planned_length_days >= bars[0].completed_length_days);
        }
    }

    #[test]
    fn milestone_passes_through_unchanged() {
        let rows = vec![
            TaskRow::new(1.0, "a", date(2026, 1, 5), 2).milestone(date(2026, 3, 2)),
            TaskRow::new(2.0, "b", date(2026, 1, 5), 2),
        ];
        let bars = compute(&rows, &palette_for(&rows)).unwrap();

        assert_eq!(bars[0].milestone, Some(date(2026, 3, 2)));
        assert_eq!(bars[1].milestone, None);
    }

    #[test]
    fn compute_is_idempotent() {
        let rows = vec![
            TaskRow::new(3.1, "c", date(2026, 1, 5), 20).completed(15),
            TaskRow::new(2.0, "b", date(2026, 2, 2), 25).completed(3),
            TaskRow::new(1.0, "a", date(2026, 3, 9), 40).completed(35),
        ];
        let colors = palette_for(&rows);

        let first = compute(&rows, &colors).unwrap();
        let second = compute(&rows, &colors).unwrap();
        assert_eq!(first, second);
    }
}
