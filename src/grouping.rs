//! Daily grouping of logged hours and forced corrections.
//!
//! Time entries are folded into one [`DailyTimeTotal`] per day in a single
//! pass. Forced overrides are kept next to the natural totals so callers can
//! show both the logged and the effective figure for a day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::core::{accumulate, Error, TimeEntry};

/// Manual correction of a day's logged hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ForcedOverride {
    /// Discard the natural total and use this value
    Replace(f64),
    /// Add this value to the natural total
    Delta(f64),
}

impl ForcedOverride {
    pub fn apply(&self, natural: f64) -> f64 {
        match self {
            Self::Replace(value) => *value,
            Self::Delta(delta) => natural + delta,
        }
    }
}

/// A leading sign marks an additive delta; a bare number replaces.
impl FromStr for ForcedOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parse = |text: &str| {
            text.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::configuration(format!("Invalid forced value '{}'", s)))
        };

        match trimmed.chars().next() {
            Some('+') | Some('-') => parse(trimmed).map(Self::Delta),
            Some(_) => parse(trimmed).map(Self::Replace),
            None => Err(Error::configuration("Empty forced value")),
        }
    }
}

/// Logged hours for one day, as grouped from raw entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTimeTotal {
    pub date: NaiveDate,
    pub total_hours: f64,
    pub hours_by_user: BTreeMap<String, f64>,
}

impl DailyTimeTotal {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_hours: 0.0,
            hours_by_user: BTreeMap::new(),
        }
    }

    fn add(&mut self, entry: &TimeEntry) {
        self.total_hours += entry.hours;
        accumulate(&mut self.hours_by_user, entry.user.clone(), entry.hours);
    }
}

/// Grouped daily hours with the sprint's forced overrides applied on read
#[derive(Debug, Clone, Default)]
pub struct DailyHours {
    days: BTreeMap<NaiveDate, DailyTimeTotal>,
    overrides: BTreeMap<NaiveDate, ForcedOverride>,
}

impl DailyHours {
    pub fn group(entries: &[TimeEntry], overrides: &BTreeMap<NaiveDate, ForcedOverride>) -> Self {
        let mut days: BTreeMap<NaiveDate, DailyTimeTotal> = BTreeMap::new();

        for entry in entries {
            days.entry(entry.date)
                .or_insert_with(|| DailyTimeTotal::new(entry.date))
                .add(entry);
        }

        Self {
            days,
            overrides: overrides.clone(),
        }
    }

    /// Sum of logged hours for `date`, ignoring overrides
    pub fn natural(&self, date: NaiveDate) -> f64 {
        self.days.get(&date).map_or(0.0, |day| day.total_hours)
    }

    /// Hours for `date` after applying its forced override, if any
    pub fn effective(&self, date: NaiveDate) -> f64 {
        let natural = self.natural(date);
        self.overrides
            .get(&date)
            .map_or(natural, |forced| forced.apply(natural))
    }

    /// Effective hours for every date with entries or an override
    pub fn effective_totals(&self) -> BTreeMap<NaiveDate, f64> {
        self.days
            .keys()
            .chain(self.overrides.keys())
            .map(|date| (*date, self.effective(*date)))
            .collect()
    }

    /// Per-user breakdown computed during grouping
    pub fn hours_by_user(&self, date: NaiveDate) -> Option<&BTreeMap<String, f64>> {
        self.days.get(&date).map(|day| &day.hours_by_user)
    }

    pub fn override_for(&self, date: NaiveDate) -> Option<ForcedOverride> {
        self.overrides.get(&date).copied()
    }

    pub fn override_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.overrides.keys().copied()
    }
}
