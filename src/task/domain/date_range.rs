//! Inclusive calendar-day ranges.

use super::TaskDomainError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;

/// Closed interval of calendar days, `start..=end`.
///
/// A range always covers at least one day: single-day ranges have
/// `start == end`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use taskboard::task::domain::DateRange;
///
/// # fn main() -> Result<(), taskboard::task::domain::TaskDomainError> {
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).expect("valid calendar day");
/// let first = DateRange::new(day(1), day(3))?;
/// let second = DateRange::new(day(3), day(5))?;
/// assert!(first.overlaps(&second));
/// assert_eq!(first.day_count(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = TaskDomainError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvertedDateRange`] when `end` precedes
    /// `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TaskDomainError> {
        if end < start {
            return Err(TaskDomainError::InvertedDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering exactly one day.
    #[must_use]
    pub const fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Returns the first day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns `true` when both ranges share at least one calendar day.
    ///
    /// Closed intervals `[a1, a2]` and `[b1, b2]` overlap iff
    /// `a1 <= b2 && b1 <= a2`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns `true` when `day` lies inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Returns the number of calendar days covered, bounds included.
    #[must_use]
    pub fn day_count(&self) -> u64 {
        self.end
            .signed_duration_since(self.start)
            .num_days()
            .unsigned_abs()
            .saturating_add(1)
    }

    /// Iterates every day of the range in ascending order.
    #[must_use]
    pub const fn days(&self) -> DateRangeDays {
        DateRangeDays {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeDays;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Ascending iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateRangeDays {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateRangeDays {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|day| *day <= self.end)?;
        self.next = current.checked_add_days(Days::new(1));
        Some(current)
    }
}

impl FusedIterator for DateRangeDays {}
