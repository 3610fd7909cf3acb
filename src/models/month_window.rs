use chrono::{Datelike, Days, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// Direction of a calendar navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Current,
    Previous,
    Next,
}

/// One calendar month and its inclusive date range
///
/// Dates are plain calendar dates with no timezone attached, so the
/// boundaries match the `YYYY-MM-DD` strings the catalog returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// Builds the window for `month` of `year`, wrapping months outside 1..=12
    /// into the neighbouring years (0 is December of the previous year).
    pub fn new(year: i32, month: i32) -> AppResult<Self> {
        let zero_based = month - 1;
        let year = year + zero_based.div_euclid(12);
        let month = (zero_based.rem_euclid(12) + 1) as u32;

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            AppError::InvalidInput(format!("{}-{:02} is out of range", year, month))
        })?;
        let next_start = start
            .checked_add_months(chrono::Months::new(1))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("{}-{:02} is out of range", year, month))
            })?;
        let end = next_start
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| AppError::Internal("month end underflow".to_string()))?;

        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// Window containing the given date
    pub fn containing(date: NaiveDate) -> AppResult<Self> {
        Self::new(date.year(), date.month() as i32)
    }

    /// The window one step away in the given direction
    pub fn step(&self, navigation: Navigation) -> AppResult<Self> {
        let month = self.month as i32;
        match navigation {
            Navigation::Current => Ok(*self),
            Navigation::Previous => Self::new(self.year, month - 1),
            Navigation::Next => Self::new(self.year, month + 1),
        }
    }

    /// Number of days in the month
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True when the date lies in the range and in this exact year/month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start
            && date <= self.end
            && date.year() == self.year
            && date.month() == self.month
    }

    /// English long-form month name, e.g. "February"
    pub fn month_name(&self) -> &'static str {
        Month::try_from(self.month as u8)
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl Display for MonthWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let window = MonthWindow::new(2024, 2).unwrap();
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));
        assert_eq!(window.start_param(), "2024-02-01");
        assert_eq!(window.end_param(), "2024-02-29");
    }

    #[test]
    fn test_window_spans_whole_month_for_every_month() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let window = MonthWindow::new(year, month).unwrap();
                assert!(window.end >= window.start);
                let expected = date(year, month as u32, 1)
                    .checked_add_months(chrono::Months::new(1))
                    .unwrap()
                    .signed_duration_since(date(year, month as u32, 1))
                    .num_days();
                assert_eq!(window.days(), expected);
                assert!((28..=31).contains(&window.days()));
            }
        }
    }

    #[test]
    fn test_leap_years() {
        assert_eq!(MonthWindow::new(2023, 2).unwrap().days(), 28);
        assert_eq!(MonthWindow::new(2024, 2).unwrap().days(), 29);
        assert_eq!(MonthWindow::new(1900, 2).unwrap().days(), 28);
        assert_eq!(MonthWindow::new(2000, 2).unwrap().days(), 29);
    }

    #[test]
    fn test_month_wraps() {
        let december = MonthWindow::new(2024, 0).unwrap();
        assert_eq!((december.year, december.month), (2023, 12));

        let january = MonthWindow::new(2024, 13).unwrap();
        assert_eq!((january.year, january.month), (2025, 1));
    }

    #[test]
    fn test_navigation_wraps_year() {
        let january = MonthWindow::new(2024, 1).unwrap();
        let previous = january.step(Navigation::Previous).unwrap();
        assert_eq!((previous.year, previous.month), (2023, 12));

        let december = MonthWindow::new(2024, 12).unwrap();
        let next = december.step(Navigation::Next).unwrap();
        assert_eq!((next.year, next.month), (2025, 1));

        assert_eq!(december.step(Navigation::Current).unwrap(), december);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = MonthWindow::new(2024, 2).unwrap();
        assert!(window.contains(date(2024, 2, 1)));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 1, 31)));
        assert!(!window.contains(date(2024, 3, 1)));
    }

    #[test]
    fn test_month_name_and_display() {
        let window = MonthWindow::new(2024, 2).unwrap();
        assert_eq!(window.month_name(), "February");
        assert_eq!(window.to_string(), "February 2024");
    }

    #[test]
    fn test_containing() {
        let window = MonthWindow::containing(date(2026, 10, 18)).unwrap();
        assert_eq!((window.year, window.month), (2026, 10));
        assert_eq!(window.end, date(2026, 10, 31));
    }
}
