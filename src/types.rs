use crate::consts::{DECEMBER, JANUARY, MONTHS_PER_QUARTER};
use crate::ParseError;
use crate::prelude::*;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The day a week starts on for week boundary helpers.
///
/// Defaults to Monday (ISO 8601). Sunday is the US/Canada convention.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum WeekStart {
    #[default]
    #[display(fmt = "monday")]
    Monday,
    #[display(fmt = "sunday")]
    Sunday,
}

impl WeekStart {
    /// Returns the first weekday of a week
    #[inline]
    pub const fn first_weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Mon,
            Self::Sunday => Weekday::Sun,
        }
    }

    /// Returns the last weekday of a week
    #[inline]
    pub const fn last_weekday(self) -> Weekday {
        match self {
            Self::Monday => Weekday::Sun,
            Self::Sunday => Weekday::Sat,
        }
    }

    /// How many days `weekday` is after the first day of the week (0..=6)
    #[inline]
    pub fn days_from(self, weekday: Weekday) -> u32 {
        match self {
            Self::Monday => weekday.num_days_from_monday(),
            Self::Sunday => weekday.num_days_from_sunday(),
        }
    }
}

impl FromStr for WeekStart {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "sunday" | "sun" => Ok(Self::Sunday),
            _ => Err(ParseError::InvalidWeekStart(trimmed.to_owned())),
        }
    }
}

impl TryFrom<String> for WeekStart {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekStart> for String {
    fn from(start: WeekStart) -> Self {
        start.to_string()
    }
}

// Helper functions

/// First month of the quarter containing `month`
pub(crate) const fn quarter_start_month(month: u32) -> u32 {
    debug_assert!(month >= JANUARY && month <= DECEMBER);

    (month - JANUARY) / MONTHS_PER_QUARTER * MONTHS_PER_QUARTER + JANUARY
}

/// Last month of the quarter containing `month`
pub(crate) const fn quarter_end_month(month: u32) -> u32 {
    quarter_start_month(month) + MONTHS_PER_QUARTER - 1
}
