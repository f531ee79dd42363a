use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::{PERIOD_SEPARATOR, ParseError};

/// An inclusive span between two dates or times.
/// The start must be less than or equal to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "{start}/{end}")]
#[display(bound = "T: fmt::Display")]
pub struct Period<T> {
    start: T,
    end:   T,
}

/// Error type for period operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Start is after end.
    #[error("Invalid period: start ({start}) is after end ({end})")]
    InvalidRange { start: String, end: String },

    /// Error parsing one of the bounds.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid period format.
    #[error("Invalid period format: {0}")]
    InvalidFormat(String),
}

impl<T> Period<T> {
    /// Builds a period whose bounds are already ordered.
    pub(crate) const fn spanning(start: T, end: T) -> Self {
        Self { start, end }
    }

    /// Returns the first value of the period
    pub const fn start(&self) -> &T {
        &self.start
    }

    /// Returns the last value of the period (inclusive)
    pub const fn end(&self) -> &T {
        &self.end
    }

    /// Consumes the period, returning `(start, end)`
    pub fn into_bounds(self) -> (T, T) {
        (self.start, self.end)
    }
}

impl<T: Clone> Period<T> {
    /// Returns both bounds as a tuple
    pub fn bounds(&self) -> (T, T) {
        (self.start.clone(), self.end.clone())
    }
}

impl<T: Ord + fmt::Display> Period<T> {
    /// Creates a new period with validation.
    ///
    /// # Errors
    /// Returns `PeriodError::InvalidRange` if start > end.
    pub fn new(start: T, end: T) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvalidRange {
                start: start.to_string(),
                end:   end.to_string(),
            });
        }
        Ok(Self { start, end })
    }
}

impl<T: Ord> Period<T> {
    /// Checks if the period contains a given value
    pub fn contains(&self, value: &T) -> bool {
        self.start <= *value && *value <= self.end
    }

    /// Checks if this period shares at least one value with another
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Checks if this period is completely contained within another
    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }
}

impl Period<NaiveDate> {
    /// Number of calendar days in the period, both ends included
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates over every date in the period, in order
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

fn parse_bound<T: FromStr>(s: &str) -> Result<T, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    trimmed
        .parse::<T>()
        .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))
}

impl<T: FromStr + Ord + fmt::Display> FromStr for Period<T> {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // ISO 8601 interval format: PERIOD_SEPARATOR separates start/end
        let separator_count = trimmed.matches(PERIOD_SEPARATOR).count();

        match separator_count {
            0 => Err(PeriodError::InvalidFormat(format!(
                "No period separator found (expected '{PERIOD_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(PERIOD_SEPARATOR).ok_or_else(|| {
                    PeriodError::InvalidFormat(format!("Separator '{PERIOD_SEPARATOR}' not found despite count == 1"))
                })?;

                let start = parse_bound(start_str)?;
                let end = parse_bound(end_str)?;

                Self::new(start, end)
            },
            _ => Err(PeriodError::InvalidFormat(format!(
                "Too many '{PERIOD_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl<T: fmt::Display> Serialize for Period<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr + Ord + fmt::Display> Deserialize<'de> for Period<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
