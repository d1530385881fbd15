//! Sprint calendar construction.
//!
//! The calendar is the authoritative list of days a sprint covers. Every
//! other stage keys its facts by these dates, so it is built once per run
//! and never modified afterwards.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::core::{Error, FactKind, Result};

/// Ordered, gap-free, inclusive run of calendar days
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarRange {
    dates: Vec<NaiveDate>,
}

impl CalendarRange {
    /// Build the calendar using the local date as "today".
    pub fn build(start: NaiveDate, end: NaiveDate, clamp_to_today: bool) -> Result<Self> {
        Self::build_as_of(start, end, clamp_to_today, Local::now().date_naive())
    }

    /// Build the calendar against an explicit "today".
    ///
    /// Weekends are kept; filtering working days is a caller policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] when `start > end`, or when clamping
    /// moves the end before the start (a sprint that has not begun yet).
    pub fn build_as_of(
        start: NaiveDate,
        end: NaiveDate,
        clamp_to_today: bool,
        today: NaiveDate,
    ) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        let end = if clamp_to_today && end > today {
            today
        } else {
            end
        };

        if start > end {
            return Err(Error::InvalidRange { start, end });
        }

        let days = (end - start).num_days() as usize + 1;
        let dates = start.iter_days().take(days).collect();

        Ok(Self { dates })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Calendar days in ascending order
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// First day; a calendar always holds at least one
    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Last day, after any clamp to today
    pub fn end(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// O(1): the dates are contiguous, so a bounds check is enough
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }

    /// Fail with [`Error::MissingCalendarDate`] if `date` is outside the range
    pub fn ensure_contains(&self, date: NaiveDate, kind: FactKind) -> Result<()> {
        if self.contains(date) {
            Ok(())
        } else {
            Err(Error::MissingCalendarDate {
                kind,
                date,
                start: self.start(),
                end: self.end(),
            })
        }
    }
}
