//! Fixed-shape month grid: six weeks of seven days around a reference month.

use chrono::{Days, NaiveDate, Weekday};

use crate::date::{days_in_month, first_weekday_of_month, YearMonth};

/// Cells per grid (6 rows * 7 days)
pub const GRID_CELLS: usize = 42;

pub const DAYS_PER_WEEK: usize = 7;

/// A single day shown in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for padding days borrowed from the neighbouring months
    pub is_current_month: bool,
}

/// The 42 cells displayed for one reference month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub month: YearMonth,
    pub week_start: Weekday,
    pub cells: Vec<CalendarCell>,
}

impl MonthView {
    /// Rows of seven cells, top to bottom
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    pub fn current_month_cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.cells.iter().filter(|c| c.is_current_month)
    }
}

/// Build the grid for `month`.
///
/// Leading cells hold the tail of the previous month, then every day of
/// `month`, then the head of the next month until there are exactly
/// [`GRID_CELLS`] cells. Padding is walked day by day outward from the
/// month itself.
pub fn build_month_grid(month: YearMonth, week_start: Weekday) -> MonthView {
    let leading = u64::from(first_weekday_of_month(month, week_start));
    let first = month.first_day();
    let grid_start = first.checked_sub_days(Days::new(leading)).unwrap_or(first);

    let mut cells = Vec::with_capacity(GRID_CELLS);

    cells.extend(
        grid_start
            .iter_days()
            .take_while(|&date| !month.contains(date))
            .map(|date| CalendarCell {
                date,
                is_current_month: false,
            }),
    );

    let days = days_in_month(month);
    cells.extend(days.iter().map(|&date| CalendarCell {
        date,
        is_current_month: true,
    }));

    let remaining = GRID_CELLS.saturating_sub(cells.len());
    if let Some(after) = days.last().and_then(|last| last.succ_opt()) {
        cells.extend(
            after
                .iter_days()
                .take(remaining)
                .map(|date| CalendarCell {
                    date,
                    is_current_month: false,
                }),
        );
    }

    cells.truncate(GRID_CELLS);

    MonthView {
        month,
        week_start,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn assert_grid_invariants(view: &MonthView) {
        assert_eq!(view.cells.len(), GRID_CELLS, "month {}", view.month);

        for pair in view.cells.windows(2) {
            assert_eq!(
                pair[0].date.succ_opt(),
                Some(pair[1].date),
                "cells not contiguous in {}",
                view.month
            );
        }

        for cell in &view.cells {
            assert_eq!(cell.is_current_month, view.month.contains(cell.date));
        }

        assert_eq!(
            view.current_month_cells().count(),
            days_in_month(view.month).len(),
            "month {}",
            view.month
        );
    }

    #[test]
    fn test_every_month_over_two_decades() {
        let mut month = ym(2010, 1);
        for _ in 0..(12 * 20) {
            assert_grid_invariants(&build_month_grid(month, Weekday::Sun));
            assert_grid_invariants(&build_month_grid(month, Weekday::Mon));
            month = month.next();
        }
    }

    #[test]
    fn test_leap_february() {
        let view = build_month_grid(ym(2024, 2), Weekday::Sun);
        assert_eq!(view.cells.len(), 42);
        assert_eq!(view.current_month_cells().count(), 29);
        // Thursday start: four January days lead the grid
        assert_eq!(view.cells[0].date, ymd(2024, 1, 28));
        assert_eq!(view.cells[4].date, ymd(2024, 2, 1));
        assert_eq!(view.cells[41].date, ymd(2024, 3, 9));
    }

    #[test]
    fn test_non_leap_february() {
        let view = build_month_grid(ym(2023, 2), Weekday::Sun);
        assert_eq!(view.current_month_cells().count(), 28);
        assert_grid_invariants(&view);
    }

    #[test]
    fn test_month_starting_on_week_start_has_no_leading_cells() {
        // 2024-09-01 is a Sunday
        let view = build_month_grid(ym(2024, 9), Weekday::Sun);
        assert_eq!(view.cells[0].date, ymd(2024, 9, 1));
        assert!(view.cells[0].is_current_month);
        // 30 days + 12 padding days from October
        assert_eq!(view.cells[41].date, ymd(2024, 10, 12));
    }

    #[test]
    fn test_month_starting_on_last_column_spans_six_rows() {
        // 2023-07-01 is a Saturday: 6 leading + 31 days + 5 trailing
        let view = build_month_grid(ym(2023, 7), Weekday::Sun);
        assert_eq!(view.cells[0].date, ymd(2023, 6, 25));
        assert_eq!(view.cells[6].date, ymd(2023, 7, 1));
        assert_eq!(view.cells[41].date, ymd(2023, 8, 5));
        assert_grid_invariants(&view);
    }

    #[test]
    fn test_short_month_still_padded_to_six_weeks() {
        // 2015-02 fits in exactly four Sunday-start weeks
        let view = build_month_grid(ym(2015, 2), Weekday::Sun);
        assert_eq!(view.cells[0].date, ymd(2015, 2, 1));
        assert_eq!(view.cells.iter().filter(|c| !c.is_current_month).count(), 14);
        assert_grid_invariants(&view);
    }

    #[test]
    fn test_january_borrows_from_previous_december() {
        // 2025-01-01 is a Wednesday
        let view = build_month_grid(ym(2025, 1), Weekday::Sun);
        assert_eq!(view.cells[0].date, ymd(2024, 12, 29));
        assert!(!view.cells[0].is_current_month);
    }

    #[test]
    fn test_monday_start_shifts_columns() {
        // 2024-09-01 is a Sunday: last column when weeks start on Monday
        let view = build_month_grid(ym(2024, 9), Weekday::Mon);
        assert_eq!(view.cells[0].date, ymd(2024, 8, 26));
        assert_eq!(view.cells[6].date, ymd(2024, 9, 1));
    }

    #[test]
    fn test_weeks_are_six_rows_of_seven() {
        let view = build_month_grid(ym(2024, 5), Weekday::Sun);
        let weeks: Vec<_> = view.weeks().collect();
        assert_eq!(weeks.len(), 6);
        assert!(weeks.iter().all(|w| w.len() == 7));
    }

    #[test]
    fn test_grids_at_the_edges_of_the_calendar_stay_contiguous() {
        for edge in [NaiveDate::MIN, NaiveDate::MAX] {
            let month = YearMonth::of(edge);
            for week_start in [Weekday::Sun, Weekday::Mon, Weekday::Sat] {
                assert_grid_invariants(&build_month_grid(month, week_start));
            }
        }
    }

    #[test]
    fn test_navigation_stays_inside_the_calendar() {
        let last = YearMonth::of(NaiveDate::MAX);
        let view = build_month_grid(last.next(), Weekday::Sun);
        assert_eq!(view.month, last);
        assert_grid_invariants(&view);

        let first = YearMonth::of(NaiveDate::MIN);
        assert_grid_invariants(&build_month_grid(first.prev(), Weekday::Sun));
        assert_grid_invariants(&build_month_grid(first.next(), Weekday::Mon));
    }
}
