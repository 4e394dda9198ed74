//! Business-day calendar arithmetic.
//!
//! Effort-days count only working days, but the drawn bars span calendar
//! days. This module provides the fixed Mon-Fri calendar and the forward
//! advance used to turn an effort count into a calendar end date.

use chrono::{Datelike, NaiveDate};

/// Working-day calendar with a fixed weekday mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessCalendar {
    /// Working flags indexed Monday = 0 .. Sunday = 6.
    working_days: [bool; 7],
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::weekdays()
    }
}

impl BusinessCalendar {
    /// The standard Monday-Friday calendar.
    pub fn weekdays() -> Self {
        Self {
            working_days: [true, true, true, true, true, false, false],
        }
    }

    /// Check if a date is a working day
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days[date.weekday().num_days_from_monday() as usize]
    }

    /// Move `date` forward to the next working day; a date already on a
    /// working day is returned unchanged.
    pub fn roll_forward(&self, date: NaiveDate) -> NaiveDate {
        let mut current = date;
        while !self.is_working_day(current) {
            current += chrono::Duration::days(1);
        }
        current
    }

    /// Advance `start` forward so that `effort_days` working days are
    /// consumed, the (rolled-forward) start counting as day one.
    ///
    /// An `effort_days` of 0 behaves as 1; callers uphold the >= 1
    /// invariant before reaching the calculator.
    pub fn advance(&self, start: NaiveDate, effort_days: u32) -> NaiveDate {
        let mut current = self.roll_forward(start);
        for _ in 1..effort_days {
            current += chrono::Duration::days(1);
            current = self.roll_forward(current);
        }
        current
    }
}
