//! Inclusive calendar date ranges
//!
//! A [`DateRange`] is validated once at construction and can then be iterated
//! any number of times, one day per step in ascending order.

use crate::CrawlerError;
use chrono::{Days, NaiveDate};
use std::iter::FusedIterator;

/// Inclusive range of calendar days with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a new range
    ///
    /// # Returns
    ///
    /// * `Ok(DateRange)` - `start` is on or before `end`
    /// * `Err(CrawlerError::InvalidRange)` - `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CrawlerError> {
        if start > end {
            return Err(CrawlerError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range, both ends included
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// A range always holds at least one day
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns a fresh iterator starting at `start`
    pub fn iter(&self) -> Dates {
        Dates {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Dates;

    fn into_iter(self) -> Dates {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = Dates;

    fn into_iter(self) -> Dates {
        self.iter()
    }
}

/// Lazy iterator over the days of a [`DateRange`]
#[derive(Debug, Clone)]
pub struct Dates {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Dates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.end {
            current.checked_add_days(Days::new(1))
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map(|next| (self.end - next).num_days() as usize + 1)
            .unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Dates {}

impl FusedIterator for Dates {}
