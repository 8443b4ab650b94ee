use chrono::{Datelike, Duration, Months, NaiveDate};
use opinion_core::Granularity;

/// Start of the calendar period containing `date`.
///
/// Weeks start on Monday, months on the 1st.
pub fn period_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Day => date,
        Granularity::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
        Granularity::Month => date.with_day(1).unwrap_or(date),
    }
}

/// Start of the period after the one beginning at `start`
pub fn next_period(start: NaiveDate, granularity: Granularity) -> Option<NaiveDate> {
    match granularity {
        Granularity::Day => start.succ_opt(),
        Granularity::Week => start.checked_add_signed(Duration::days(7)),
        Granularity::Month => start.checked_add_months(Months::new(1)),
    }
}

/// Every period start from the period containing `start` through the one
/// containing `end`. Empty when `start > end`.
pub fn period_grid(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    let mut periods = Vec::new();
    if start > end {
        return periods;
    }

    let last = period_start(end, granularity);
    let mut current = Some(period_start(start, granularity));
    while let Some(p) = current {
        if p > last {
            break;
        }
        periods.push(p);
        current = next_period(p, granularity);
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_starts_monday() {
        // 2025-03-02 is a Sunday, belongs to the week of Mon 2025-02-24
        assert_eq!(period_start(d(2025, 3, 2), Granularity::Week), d(2025, 2, 24));
        assert_eq!(period_start(d(2025, 3, 3), Granularity::Week), d(2025, 3, 3));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(period_start(d(2025, 2, 28), Granularity::Month), d(2025, 2, 1));
    }

    #[test]
    fn test_grid_spans_partial_periods() {
        let grid = period_grid(d(2025, 1, 30), d(2025, 3, 2), Granularity::Month);
        assert_eq!(grid, vec![d(2025, 1, 1), d(2025, 2, 1), d(2025, 3, 1)]);

        let grid = period_grid(d(2025, 12, 31), d(2026, 1, 1), Granularity::Day);
        assert_eq!(grid, vec![d(2025, 12, 31), d(2026, 1, 1)]);
    }

    #[test]
    fn test_grid_weekly_across_year_end() {
        let grid = period_grid(d(2025, 12, 25), d(2026, 1, 8), Granularity::Week);
        assert_eq!(grid, vec![d(2025, 12, 22), d(2025, 12, 29), d(2026, 1, 5)]);
    }

    #[test]
    fn test_grid_empty_when_reversed() {
        assert!(period_grid(d(2025, 2, 1), d(2025, 1, 1), Granularity::Day).is_empty());
    }
}
