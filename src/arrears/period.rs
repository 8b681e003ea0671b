use chrono::{DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{AccrualError, Result};

/// one calendar month, the unit of profit accrual and payment matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Period {
    /// create from a year and a zero-based month index, normalizing the index
    pub fn new(year: i32, month_index: i32) -> Result<Self> {
        let (year, month_index) = shift_month(year, month_index, 0);
        let out_of_range = || AccrualError::CalculationError {
            message: format!("month {} of year {} is out of range", month_index + 1, year),
        };

        let first_day = NaiveDate::from_ymd_opt(year, month_index + 1, 1).ok_or_else(out_of_range)?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or_else(out_of_range)?;

        Ok(Self { first_day, last_day })
    }

    /// the month an instant falls in
    pub fn containing(instant: DateTime<Utc>) -> Result<Self> {
        Self::new(instant.year(), instant.month0() as i32)
    }

    /// the period `offset` months away (negative walks backward)
    pub fn shifted(&self, offset: i32) -> Result<Self> {
        let (year, month_index) = shift_month(self.year(), self.month_index() as i32, offset);
        Self::new(year, month_index as i32)
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// one-based month
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// zero-based month
    pub fn month_index(&self) -> u32 {
        self.first_day.month0()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn days(&self) -> u32 {
        self.last_day.day()
    }

    /// midnight on the first day
    pub fn start(&self) -> DateTime<Utc> {
        self.first_day.and_time(NaiveTime::MIN).and_utc()
    }

    /// last instant of the last day
    pub fn end(&self) -> DateTime<Utc> {
        self.last_day.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::nanoseconds(1)
    }

    /// inclusive on both ends
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant <= self.end()
    }

    /// the given day of this month, clamped to the month length
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days());
        self.first_day
            .checked_add_days(Days::new(u64::from(day - 1)))
            .unwrap_or(self.last_day)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// first instant of a month (zero-based month index)
pub fn month_start(year: i32, month_index: i32) -> Result<DateTime<Utc>> {
    Ok(Period::new(year, month_index)?.start())
}

/// last instant of a month (zero-based month index)
pub fn month_end(year: i32, month_index: i32) -> Result<DateTime<Utc>> {
    Ok(Period::new(year, month_index)?.end())
}

/// move a (year, zero-based month) pair by `offset` months
///
/// indices outside 0..=11 are carried into the year, so month -1 of 2024
/// is month 11 of 2023 and month 12 of 2024 is month 0 of 2025.
pub fn shift_month(year: i32, month_index: i32, offset: i32) -> (i32, u32) {
    let total = i64::from(year) * 12 + i64::from(month_index) + i64::from(offset);
    (total.div_euclid(12) as i32, total.rem_euclid(12) as u32)
}

/// whole calendar-month steps from `from`'s month to `to`'s month
///
/// days are ignored. negative when `to` is in an earlier month.
pub fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}
