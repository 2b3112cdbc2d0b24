//! Persisted throttle record
//!
//! Stored as `"{year}-{month}-{day}.{sendCount}.{triggered}"`, e.g.
//! `2024-3-7.1.0`. The layout is shared with records written by earlier
//! releases, so it must not change.

use crate::utils::error::TelemetryError;
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Throttle state of one message category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleRecord {
    /// Last window boundary considered
    pub date: NaiveDate,
    /// Attempts recorded against the current window's quota
    pub send_count: u32,
    /// Whether the current window is armed
    pub triggered: bool,
}

impl ThrottleRecord {
    /// Fresh record: count 0, not triggered
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            send_count: 0,
            triggered: false,
        }
    }
}

impl fmt::Display for ThrottleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}.{}.{}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.send_count,
            u8::from(self.triggered)
        )
    }
}

impl FromStr for ThrottleRecord {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TelemetryError::parsing(format!("invalid throttle record: {:?}", s));

        let mut parts = s.trim().split('.');
        let (Some(date), Some(count), Some(flag), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let mut ymd = date.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (ymd.next(), ymd.next(), ymd.next(), ymd.next())
        else {
            return Err(invalid());
        };

        let date = NaiveDate::from_ymd_opt(
            year.parse().map_err(|_| invalid())?,
            month.parse().map_err(|_| invalid())?,
            day.parse().map_err(|_| invalid())?,
        )
        .ok_or_else(invalid)?;

        let send_count = count.parse().map_err(|_| invalid())?;
        let triggered = match flag {
            "0" => false,
            "1" => true,
            _ => return Err(invalid()),
        };

        Ok(Self {
            date,
            send_count,
            triggered,
        })
    }
}
