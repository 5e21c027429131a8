//! # Period Filters
//!
//! Date-range filters shared by the purchase/expense listings, the backup
//! export and the analytics summary.
//!
//! A period resolves to a half-open UTC range `[start, end)`; `All` resolves
//! to no range at all (lifetime data). Endpoints map their own filter
//! vocabulary ("daily", "today", "lifetime"...) onto these variants.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A reporting period, relative to "now" except for [`Period::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// No date filtering (lifetime).
    All,
    /// The current calendar day.
    Today,
    /// The current day and the six before it.
    Last7Days,
    /// The current calendar month.
    ThisMonth,
    /// The current calendar year.
    ThisYear,
    /// An inclusive date range picked by the operator.
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Period {
    /// Resolves the period against `now` into a half-open `[start, end)`
    /// range, or `None` when no filtering applies.
    pub fn range(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let today = now.date_naive();
        match *self {
            Period::All => None,
            Period::Today => Some((start_of_day(today), start_of_day(today) + Duration::days(1))),
            Period::Last7Days => Some((
                start_of_day(today - Duration::days(6)),
                start_of_day(today) + Duration::days(1),
            )),
            Period::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                Some((start_of_day(first), start_of_day(first_of_next_month(today))))
            }
            Period::ThisYear => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let next = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(today);
                Some((start_of_day(first), start_of_day(next)))
            }
            Period::Custom { from, to } => {
                Some((start_of_day(from), start_of_day(to) + Duration::days(1)))
            }
        }
    }

    /// Whether `date` falls inside the period as seen from `now`.
    pub fn contains(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.range(now) {
            None => true,
            Some((start, end)) => date >= start && date < end,
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn first_of_next_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    // Day 1 of a real month always exists
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_all_has_no_range() {
        assert_eq!(Period::All.range(at(2026, 3, 15, 12)), None);
        assert!(Period::All.contains(at(1999, 1, 1, 0), at(2026, 3, 15, 12)));
    }

    #[test]
    fn test_today_bounds() {
        let now = at(2026, 3, 15, 14);
        let (start, end) = Period::Today.range(now).unwrap();
        assert_eq!(start, at(2026, 3, 15, 0));
        assert_eq!(end, at(2026, 3, 16, 0));
        assert!(Period::Today.contains(at(2026, 3, 15, 23), now));
        assert!(!Period::Today.contains(at(2026, 3, 16, 0), now));
    }

    #[test]
    fn test_last_7_days_spans_a_week() {
        let now = at(2026, 3, 15, 9);
        let (start, end) = Period::Last7Days.range(now).unwrap();
        assert_eq!(start, at(2026, 3, 9, 0));
        assert_eq!(end, at(2026, 3, 16, 0));
    }

    #[test]
    fn test_this_month_december_rollover() {
        let now = at(2026, 12, 20, 9);
        let (start, end) = Period::ThisMonth.range(now).unwrap();
        assert_eq!(start, at(2026, 12, 1, 0));
        assert_eq!(end, at(2027, 1, 1, 0));
    }

    #[test]
    fn test_this_year_bounds() {
        let now = at(2026, 6, 1, 9);
        let (start, end) = Period::ThisYear.range(now).unwrap();
        assert_eq!(start, at(2026, 1, 1, 0));
        assert_eq!(end, at(2027, 1, 1, 0));
    }

    #[test]
    fn test_custom_is_inclusive_of_both_dates() {
        let period = Period::Custom {
            from: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        };
        let now = at(2026, 3, 15, 9);
        assert!(period.contains(at(2026, 2, 1, 0), now));
        assert!(period.contains(at(2026, 2, 10, 23), now));
        assert!(!period.contains(at(2026, 2, 11, 0), now));
    }
}
