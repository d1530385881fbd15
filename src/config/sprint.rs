//! Resolution of raw sprint sections into typed [`SprintConfig`] values.
//!
//! Every string-keyed or loosely-typed field is parsed here, once, so the
//! pipeline only ever sees dates and tagged overrides.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::core::{BurnupConfig, ForcedValue, SprintSection, TargetsSection};
use crate::core::{Error, Result, HOURS_PER_MAN_DAY};
use crate::grouping::ForcedOverride;

/// Fully resolved sprint definition passed into the pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintConfig {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub commited_man_days: f64,
    pub clamp_to_today: bool,
    pub forced: BTreeMap<NaiveDate, ForcedOverride>,
    pub planned: BTreeMap<NaiveDate, f64>,
    pub targets: TargetsSection,
    pub ignored: BTreeSet<String>,
    pub commit_prefix: Option<String>,
}

impl SprintConfig {
    /// Minimal sprint with no overrides, plans or targets
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        commited_man_days: f64,
    ) -> Self {
        Self {
            name: name.into(),
            start_date,
            end_date,
            commited_man_days,
            clamp_to_today: false,
            forced: BTreeMap::new(),
            planned: BTreeMap::new(),
            targets: TargetsSection::default(),
            ignored: BTreeSet::new(),
            commit_prefix: None,
        }
    }

    /// Committed effort in hours, the man-day series' target
    pub fn committed_hours(&self) -> f64 {
        self.commited_man_days * HOURS_PER_MAN_DAY
    }
}

fn parse_day(field: &str, key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").map_err(|e| {
        Error::configuration(format!("Invalid date '{}' in `{}`: {}", key, field, e))
    })
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "`{}` must be a non-negative number, got {}",
            field, value
        )))
    }
}

impl ForcedValue {
    pub fn resolve(&self) -> Result<ForcedOverride> {
        match self {
            Self::Number(value) if value.is_finite() => Ok(ForcedOverride::Replace(*value)),
            Self::Number(value) => Err(Error::configuration(format!(
                "Invalid forced value {}",
                value
            ))),
            Self::Text(text) => text.parse(),
        }
    }
}

impl SprintSection {
    /// Parse and validate this section into a [`SprintConfig`].
    pub fn resolve(&self, name: &str) -> Result<SprintConfig> {
        ensure_non_negative("commited_man_days", self.commited_man_days)?;
        if self.start_date > self.end_date {
            return Err(Error::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.commit_prefix.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(Error::configuration("`commit_prefix` must not be empty"));
        }
        if let Some(sp) = self.targets.sp {
            ensure_non_negative("targets.sp", sp)?;
        }
        if let Some(bv) = self.targets.bv {
            ensure_non_negative("targets.bv", bv)?;
        }

        let forced = self
            .forced
            .iter()
            .map(|(key, value)| {
                let date = parse_day("forced", key)?;
                let forced = value
                    .resolve()
                    .map_err(|e| e.with_context(format!("forced value for {}", key)))?;
                Ok((date, forced))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let planned = self
            .planned
            .iter()
            .map(|(key, hours)| {
                ensure_non_negative(&format!("planned.{}", key), *hours)?;
                Ok((parse_day("planned", key)?, *hours))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(SprintConfig {
            name: name.to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            commited_man_days: self.commited_man_days,
            clamp_to_today: self.clamp_to_today,
            forced,
            planned,
            targets: self.targets,
            ignored: self.ignored.iter().cloned().collect(),
            commit_prefix: self.commit_prefix.clone(),
        })
    }
}

impl BurnupConfig {
    pub fn has_sprints(&self) -> bool {
        !self.sprints.is_empty()
    }

    /// Every sprint that fails to resolve, in name order
    pub fn sprint_errors(&self) -> Vec<(&str, Error)> {
        self.sprints
            .iter()
            .filter_map(|(name, section)| {
                section.resolve(name).err().map(|err| (name.as_str(), err))
            })
            .collect()
    }

    /// Name of the sprint to use: explicit, else `current`, else the only one.
    pub fn sprint_name<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str> {
        if let Some(name) = requested.or(self.current.as_deref()) {
            return Ok(name);
        }

        match self.sprints.keys().next() {
            Some(only) if self.sprints.len() == 1 => Ok(only.as_str()),
            Some(_) => Err(Error::configuration(
                "No sprint given and no `current` sprint set in configuration",
            )),
            None => Err(Error::configuration("No sprints defined in configuration")),
        }
    }

    /// Resolve the requested (or current) sprint.
    pub fn sprint(&self, requested: Option<&str>) -> Result<SprintConfig> {
        let name = self.sprint_name(requested)?;
        let section = self.sprints.get(name).ok_or_else(|| {
            Error::configuration(format!(
                "Sprint {} not found. Make sure it's defined in your settings file",
                name
            ))
        })?;

        section
            .resolve(name)
            .map_err(|e| e.with_context(format!("Sprint {}", name)))
    }
}
