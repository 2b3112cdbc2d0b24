//! Calendar window arithmetic

use crate::config::ThrottleInterval;
use chrono::{Datelike, NaiveDate};

/// Whole calendar months from `from` to `to`
///
/// A month only counts once the day of month has been reached again, so
/// 2024-12-20 to 2025-01-19 is 0 months and to 2025-01-20 is 1 month.
pub(super) fn whole_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let mut months = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    if to.day() < from.day() {
        months -= 1;
    }
    months
}

/// Whole days from `from` to `to`
pub(super) fn whole_days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// A new window opens once both the month and the day interval have elapsed
pub(super) fn is_window_open(from: NaiveDate, today: NaiveDate, interval: &ThrottleInterval) -> bool {
    whole_months_between(from, today) >= i64::from(interval.month_interval)
        && whole_days_between(from, today) >= i64::from(interval.day_interval)
}

/// Ordinal of the day-interval slot `today` falls in within its month, from 1
pub(super) fn month_slot(today: NaiveDate, day_interval: u32) -> u32 {
    let width = day_interval.max(1);
    today.day().div_ceil(width)
}

/// Whether the current slot is still under the monthly ceiling
pub(super) fn within_monthly_ceiling(today: NaiveDate, interval: &ThrottleInterval) -> bool {
    month_slot(today, interval.day_interval) <= interval.max_times_per_month
}
