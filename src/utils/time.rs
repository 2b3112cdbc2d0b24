//! Calendar clock abstraction
//!
//! Throttle windows are measured in whole UTC calendar days, so the only time
//! the crate needs is "today".

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

/// Source of the current UTC date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in UTC
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to a date that can be moved explicitly
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: RwLock::new(today),
        }
    }

    /// Pin the clock to a new date
    pub fn set(&self, today: NaiveDate) {
        *self.today.write() = today;
    }

    /// Move the clock forward by whole days
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.write();
        if let Some(next) = today.checked_add_days(chrono::Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.read()
    }
}
