//! Streak and continuity calculations over sets of entry dates.
//!
//! # Invariants
//! - The current streak is anchored at `today`: a missing `today` means 0,
//!   regardless of older runs.
//! - Month lengths come from calendar arithmetic (leap years, December
//!   rollover).

use super::{AnalyticsResult, DateRangeError};
use crate::repo::record_store::RecordStore;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Consecutive days ending at `today` that have an entry.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor.filter(|day| dates.contains(day)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

/// Longest run of consecutive days in `dates`.
pub fn max_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    // BTreeSet iterates ascending.
    for &date in dates {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(date);
    }
    best
}

/// Number of days in `year-month`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, DateRangeError> {
    let invalid = DateRangeError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(invalid)?;
    let days = next_first.signed_duration_since(first).num_days();
    u32::try_from(days).map_err(|_| invalid)
}

/// Entry coverage for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCoverage {
    pub year: i32,
    pub month: u32,
    pub days_with_entries: u32,
    pub days_in_month: u32,
    /// `days_with_entries / days_in_month * 100`.
    pub ratio_percent: f64,
}

pub fn monthly_coverage(
    dates: &BTreeSet<NaiveDate>,
    year: i32,
    month: u32,
) -> Result<MonthlyCoverage, DateRangeError> {
    let days_in_month = days_in_month(year, month)?;
    let days_with_entries = dates
        .iter()
        .filter(|date| date.year() == year && date.month() == month)
        .count();
    let days_with_entries = u32::try_from(days_with_entries).unwrap_or(u32::MAX);

    Ok(MonthlyCoverage {
        year,
        month,
        days_with_entries,
        days_in_month,
        ratio_percent: f64::from(days_with_entries) / f64::from(days_in_month) * 100.0,
    })
}

/// Continuity numbers shown alongside the entry calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSummary {
    pub today: NaiveDate,
    pub current_streak: u32,
    pub max_streak: u32,
    pub coverage: MonthlyCoverage,
    pub total_entry_days: usize,
    pub has_entry_today: bool,
}

/// Computes streaks and coverage for `year-month` from the store's entries.
pub fn calendar_summary<S: RecordStore>(
    store: &S,
    today: NaiveDate,
    year: i32,
    month: u32,
) -> AnalyticsResult<CalendarSummary> {
    // Validate the month before touching the store.
    days_in_month(year, month)?;
    let dates = entry_dates(store)?;

    Ok(CalendarSummary {
        today,
        current_streak: current_streak(&dates, today),
        max_streak: max_streak(&dates),
        coverage: monthly_coverage(&dates, year, month)?,
        total_entry_days: dates.len(),
        has_entry_today: dates.contains(&today),
    })
}

/// Distinct dates that carry a diary entry.
pub fn entry_dates<S: RecordStore>(store: &S) -> AnalyticsResult<BTreeSet<NaiveDate>> {
    Ok(store.all_entries()?.into_iter().map(|entry| entry.date).collect())
}

#[cfg(test)]
mod tests {
    use super::{current_streak, days_in_month, max_streak, monthly_coverage};
    use crate::analytics::DateRangeError;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn set(dates: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        dates.iter().copied().collect()
    }

    #[test]
    fn empty_set_has_no_streaks() {
        let empty = BTreeSet::new();
        assert_eq!(max_streak(&empty), 0);
        assert_eq!(current_streak(&empty, d(2026, 5, 1)), 0);
    }

    #[test]
    fn single_date_has_max_streak_one() {
        assert_eq!(max_streak(&set(&[d(2026, 5, 1)])), 1);
    }

    #[test]
    fn current_streak_is_zero_when_today_missing() {
        let dates = set(&[d(2026, 4, 28), d(2026, 4, 29), d(2026, 4, 30)]);
        assert_eq!(current_streak(&dates, d(2026, 5, 1)), 0);
        assert_eq!(max_streak(&dates), 3);
    }

    #[test]
    fn current_streak_walks_back_across_month_boundary() {
        let dates = set(&[d(2026, 4, 25), d(2026, 4, 29), d(2026, 4, 30), d(2026, 5, 1)]);
        assert_eq!(current_streak(&dates, d(2026, 5, 1)), 3);
    }

    #[test]
    fn max_streak_resets_on_gaps() {
        let dates = set(&[
            d(2026, 1, 1),
            d(2026, 1, 2),
            d(2026, 1, 4),
            d(2026, 1, 5),
            d(2026, 1, 6),
            d(2026, 1, 9),
        ]);
        assert_eq!(max_streak(&dates), 3);
    }

    #[test]
    fn max_streak_covers_current_streak_when_today_is_latest() {
        let dates = set(&[d(2026, 2, 27), d(2026, 2, 28), d(2026, 3, 1)]);
        let today = d(2026, 3, 1);
        assert!(max_streak(&dates) >= current_streak(&dates, today));
    }

    #[test]
    fn days_in_month_handles_leap_years_and_december() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2026, 2).unwrap(), 28);
        assert_eq!(days_in_month(2026, 12).unwrap(), 31);
        assert_eq!(
            days_in_month(2026, 13).unwrap_err(),
            DateRangeError::InvalidMonth {
                year: 2026,
                month: 13
            }
        );
    }

    #[test]
    fn monthly_coverage_counts_only_target_month() {
        let dates = set(&[d(2026, 4, 30), d(2026, 6, 1), d(2026, 6, 2), d(2026, 6, 15)]);
        let coverage = monthly_coverage(&dates, 2026, 6).unwrap();
        assert_eq!(coverage.days_with_entries, 3);
        assert_eq!(coverage.days_in_month, 30);
        assert!((coverage.ratio_percent - 10.0).abs() < 1e-9);
    }
}
