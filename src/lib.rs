//! ActiveSupport-style convenience helpers for chrono dates and times.
//!
//! ```
//! use active_date::DateExt;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
//! assert_eq!(date.end_of_month(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
//! assert!(!date.is_weekend());
//! ```

mod civil;
mod consts;
mod period;
mod prelude;
mod time;
mod types;

#[cfg(test)]
mod test_utils;

pub use civil::{Civil, WallClock};
pub use consts::*;
pub use period::{Period, PeriodError};
pub use time::TimeExt;
pub use types::WeekStart;

use crate::civil::{Edge, bound, settle, shift};
use crate::prelude::*;
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use types::{quarter_end_month, quarter_start_month};

/// Errors from parsing a [`WeekStart`] or the bounds of a [`Period`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid first day of week: {_0} (expected monday or sunday)")]
    InvalidWeekStart(String),
    #[display(fmt = "Empty input")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Error type for the `checked_*` date helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The result falls outside chrono's representable dates.
    #[error("{operation} leaves the supported date range")]
    OutOfRange { operation: &'static str },

    /// The zone has no wall-clock time for the resulting date.
    #[error("{date} has no valid local time in this time zone")]
    NoLocalTime { date: NaiveDate },
}

fn week_start_date(date: NaiveDate, start: WeekStart) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(start.days_from(date.weekday()))))
}

fn week_end_date(date: NaiveDate, start: WeekStart) -> Option<NaiveDate> {
    week_start_date(date, start)?.checked_add_days(Days::new(LAST_DAY_OF_WEEK_OFFSET))
}

fn end_of_month_date(year: i32, month: u32) -> Option<NaiveDate> {
    // December of chrono's last year has no following month to step back from
    if month == DECEMBER {
        return NaiveDate::from_ymd_opt(year, DECEMBER, DECEMBER_DAYS);
    }
    NaiveDate::from_ymd_opt(year, month, MIN_DAY)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Calendar helpers for chrono's dates and times.
///
/// Implemented for every [`Civil`] type: [`NaiveDate`],
/// [`chrono::NaiveDateTime`] and [`chrono::DateTime`] in any time zone.
/// Every helper returns a new value; the receiver is never modified.
///
/// Shifting helpers (`tomorrow`, `days_since`, `months_ago`, ...) keep the time
/// of day. Boundary helpers (`beginning_of_*`, `end_of_*`) return the first or
/// last instant of the boundary day, which for a [`NaiveDate`] is the date
/// itself.
///
/// The unchecked helpers are total: a result past the limits of chrono's
/// calendar (about ±262,000 years) saturates at that limit and logs a warning.
/// The `checked_*` forms report it as [`DateError::OutOfRange`] instead.
///
/// For zoned values a shifted time that a DST fold repeats keeps the offset of
/// the value it was shifted from, so a value on the second pass stays there
/// when its date does not change.
pub trait DateExt: Civil {
    /// Same date with the time of day at midnight
    fn beginning_of_day(&self) -> Self {
        settle(
            self,
            bound(self, "beginning_of_day", Some(self.civil_date()), Edge::Start),
            Edge::Start,
        )
    }

    /// Same date at 23:59:59.999999999
    fn end_of_day(&self) -> Self {
        settle(
            self,
            bound(self, "end_of_day", Some(self.civil_date()), Edge::End),
            Edge::End,
        )
    }

    /// Span from [`beginning_of_day`](Self::beginning_of_day) to [`end_of_day`](Self::end_of_day)
    fn all_day(&self) -> Period<Self> {
        Period::spanning(self.beginning_of_day(), self.end_of_day())
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] past chrono's last date.
    fn checked_days_since(&self, days: u64) -> Result<Self, DateError> {
        shift(self, "days_since", |date| date.checked_add_days(Days::new(days)))
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] before chrono's first date.
    fn checked_days_ago(&self, days: u64) -> Result<Self, DateError> {
        shift(self, "days_ago", |date| date.checked_sub_days(Days::new(days)))
    }

    /// Moves `days` days forward. `days_since(0)` is an equal copy.
    fn days_since(&self, days: u64) -> Self {
        settle(self, self.checked_days_since(days), Edge::End)
    }

    /// Moves `days` days back. `days_ago(0)` is an equal copy.
    fn days_ago(&self, days: u64) -> Self {
        settle(self, self.checked_days_ago(days), Edge::Start)
    }

    fn tomorrow(&self) -> Self {
        self.days_since(1)
    }

    fn yesterday(&self) -> Self {
        self.days_ago(1)
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] past chrono's last date.
    fn checked_weeks_since(&self, weeks: u64) -> Result<Self, DateError> {
        let days = weeks
            .checked_mul(DAYS_PER_WEEK)
            .ok_or(DateError::OutOfRange { operation: "weeks_since" })?;
        shift(self, "weeks_since", |date| date.checked_add_days(Days::new(days)))
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] before chrono's first date.
    fn checked_weeks_ago(&self, weeks: u64) -> Result<Self, DateError> {
        let days = weeks
            .checked_mul(DAYS_PER_WEEK)
            .ok_or(DateError::OutOfRange { operation: "weeks_ago" })?;
        shift(self, "weeks_ago", |date| date.checked_sub_days(Days::new(days)))
    }

    fn weeks_since(&self, weeks: u64) -> Self {
        settle(self, self.checked_weeks_since(weeks), Edge::End)
    }

    fn weeks_ago(&self, weeks: u64) -> Self {
        settle(self, self.checked_weeks_ago(weeks), Edge::Start)
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] past chrono's last date.
    fn checked_months_since(&self, months: u32) -> Result<Self, DateError> {
        shift(self, "months_since", |date| date.checked_add_months(Months::new(months)))
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] before chrono's first date.
    fn checked_months_ago(&self, months: u32) -> Result<Self, DateError> {
        shift(self, "months_ago", |date| date.checked_sub_months(Months::new(months)))
    }

    /// Moves `months` calendar months forward.
    ///
    /// The day is clamped to the length of the target month, so January 31st
    /// plus one month is the last day of February.
    fn months_since(&self, months: u32) -> Self {
        settle(self, self.checked_months_since(months), Edge::End)
    }

    /// Moves `months` calendar months back, clamping the day like [`months_since`](Self::months_since).
    fn months_ago(&self, months: u32) -> Self {
        settle(self, self.checked_months_ago(months), Edge::Start)
    }

    fn next_month(&self) -> Self {
        self.months_since(1)
    }

    fn prev_month(&self) -> Self {
        self.months_ago(1)
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] past chrono's last date.
    fn checked_years_later(&self, years: u32) -> Result<Self, DateError> {
        let months = years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(DateError::OutOfRange { operation: "years_later" })?;
        shift(self, "years_later", |date| date.checked_add_months(Months::new(months)))
    }

    /// # Errors
    /// Returns [`DateError::OutOfRange`] before chrono's first date.
    fn checked_years_ago(&self, years: u32) -> Result<Self, DateError> {
        let months = years
            .checked_mul(MONTHS_PER_YEAR)
            .ok_or(DateError::OutOfRange { operation: "years_ago" })?;
        shift(self, "years_ago", |date| date.checked_sub_months(Months::new(months)))
    }

    /// Moves `years` years forward. February 29th lands on February 28th in
    /// a common year.
    fn years_later(&self, years: u32) -> Self {
        settle(self, self.checked_years_later(years), Edge::End)
    }

    fn years_ago(&self, years: u32) -> Self {
        settle(self, self.checked_years_ago(years), Edge::Start)
    }

    fn next_year(&self) -> Self {
        self.years_later(1)
    }

    fn prev_year(&self) -> Self {
        self.years_ago(1)
    }

    /// Saturday or Sunday
    fn is_weekend(&self) -> bool {
        matches!(self.civil_date().weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Monday through Friday
    fn is_weekday(&self) -> bool {
        !self.is_weekend()
    }

    /// The following Monday-Friday date, keeping the time of day
    fn next_weekday(&self) -> Self {
        match self.civil_date().weekday() {
            Weekday::Fri => self.days_since(3),
            Weekday::Sat => self.days_since(2),
            _ => self.tomorrow(),
        }
    }

    /// The preceding Monday-Friday date, keeping the time of day
    fn prev_weekday(&self) -> Self {
        match self.civil_date().weekday() {
            Weekday::Mon => self.days_ago(3),
            Weekday::Sun => self.days_ago(2),
            _ => self.yesterday(),
        }
    }

    /// Days since the first day of the week (0..=6)
    fn days_to_week_start(&self, start: WeekStart) -> u32 {
        start.days_from(self.civil_date().weekday())
    }

    /// Monday of this week
    fn beginning_of_week(&self) -> Self {
        self.beginning_of_week_from(WeekStart::default())
    }

    /// Sunday of this week
    fn end_of_week(&self) -> Self {
        self.end_of_week_from(WeekStart::default())
    }

    fn beginning_of_week_from(&self, start: WeekStart) -> Self {
        let first = week_start_date(self.civil_date(), start);
        settle(self, bound(self, "beginning_of_week", first, Edge::Start), Edge::Start)
    }

    fn end_of_week_from(&self, start: WeekStart) -> Self {
        let last = week_end_date(self.civil_date(), start);
        settle(self, bound(self, "end_of_week", last, Edge::End), Edge::End)
    }

    fn all_week(&self) -> Period<Self> {
        self.all_week_from(WeekStart::default())
    }

    fn all_week_from(&self, start: WeekStart) -> Period<Self> {
        Period::spanning(self.beginning_of_week_from(start), self.end_of_week_from(start))
    }

    /// Beginning of the following week
    fn next_week(&self) -> Self {
        self.next_week_from(WeekStart::default())
    }

    /// Beginning of the preceding week
    fn prev_week(&self) -> Self {
        self.prev_week_from(WeekStart::default())
    }

    fn next_week_from(&self, start: WeekStart) -> Self {
        let first = week_start_date(self.civil_date(), start)
            .and_then(|date| date.checked_add_days(Days::new(DAYS_PER_WEEK)));
        settle(self, bound(self, "next_week", first, Edge::Start), Edge::End)
    }

    fn prev_week_from(&self, start: WeekStart) -> Self {
        let first = week_start_date(self.civil_date(), start)
            .and_then(|date| date.checked_sub_days(Days::new(DAYS_PER_WEEK)));
        settle(self, bound(self, "prev_week", first, Edge::Start), Edge::Start)
    }

    fn beginning_of_month(&self) -> Self {
        let first = self.civil_date().with_day(MIN_DAY);
        settle(self, bound(self, "beginning_of_month", first, Edge::Start), Edge::Start)
    }

    /// Last day of the month, accounting for leap years
    fn end_of_month(&self) -> Self {
        let date = self.civil_date();
        let last = end_of_month_date(date.year(), date.month());
        settle(self, bound(self, "end_of_month", last, Edge::End), Edge::End)
    }

    fn all_month(&self) -> Period<Self> {
        Period::spanning(self.beginning_of_month(), self.end_of_month())
    }

    /// First day of the calendar quarter (January, April, July or October)
    fn beginning_of_quarter(&self) -> Self {
        let date = self.civil_date();
        let first = NaiveDate::from_ymd_opt(date.year(), quarter_start_month(date.month()), MIN_DAY);
        settle(self, bound(self, "beginning_of_quarter", first, Edge::Start), Edge::Start)
    }

    /// Last day of the calendar quarter (March, June, September or December)
    fn end_of_quarter(&self) -> Self {
        let date = self.civil_date();
        let last = end_of_month_date(date.year(), quarter_end_month(date.month()));
        settle(self, bound(self, "end_of_quarter", last, Edge::End), Edge::End)
    }

    fn all_quarter(&self) -> Period<Self> {
        Period::spanning(self.beginning_of_quarter(), self.end_of_quarter())
    }

    fn beginning_of_year(&self) -> Self {
        let first = NaiveDate::from_ymd_opt(self.civil_date().year(), JANUARY, MIN_DAY);
        settle(self, bound(self, "beginning_of_year", first, Edge::Start), Edge::Start)
    }

    fn end_of_year(&self) -> Self {
        let last = end_of_month_date(self.civil_date().year(), DECEMBER);
        settle(self, bound(self, "end_of_year", last, Edge::End), Edge::End)
    }

    fn all_year(&self) -> Period<Self> {
        Period::spanning(self.beginning_of_year(), self.end_of_year())
    }
}

impl<T: Civil> DateExt for T {}
