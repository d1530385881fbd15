//! Core domain types shared by every stage of the burnup pipeline.

pub mod errors;

pub use errors::{Error, FactKind, Result, ResultExt};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Hours in one man-day, the unit sprints are committed in
pub const HOURS_PER_MAN_DAY: f64 = 8.0;

/// One logged block of work from the time-tracking system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub user: String,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub description: String,
}

/// State of one issue as reported by the issue tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueEvent {
    pub issue_id: String,
    #[serde(default)]
    pub story_points: f64,
    #[serde(default)]
    pub business_value: f64,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_nice_to_have: bool,
    #[serde(default)]
    pub is_ignored: bool,
    #[serde(default)]
    pub close_date: Option<NaiveDate>,
}

impl IssueEvent {
    /// Closed with a known closing day, so it lands on the chart
    pub fn closed_on(&self) -> Option<NaiveDate> {
        if self.is_closed {
            self.close_date
        } else {
            None
        }
    }
}

/// Plotted burnup metrics, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Man-days, cumulated in hours
    Md,
    /// Story points
    Sp,
    /// Business value
    Bv,
    /// Planned hours
    Planned,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Md, Metric::Sp, Metric::Bv, Metric::Planned];

    /// Metrics that get a final-result summary
    pub const SUMMARIZED: [Metric; 3] = [Metric::Md, Metric::Sp, Metric::Bv];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Md => "md",
            Self::Sp => "sp",
            Self::Bv => "bv",
            Self::Planned => "planned",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Story-level metric tracked by the issue tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoryMetric {
    StoryPoints,
    BusinessValue,
}

impl StoryMetric {
    pub fn of(&self, event: &IssueEvent) -> f64 {
        match self {
            Self::StoryPoints => event.story_points,
            Self::BusinessValue => event.business_value,
        }
    }
}

/// Sum-on-conflict merge of `amount` into the bucket for `key`
pub fn accumulate<K: Ord>(buckets: &mut BTreeMap<K, f64>, key: K, amount: f64) {
    *buckets.entry(key).or_insert(0.0) += amount;
}
