use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root configuration structure for burnup (`.burnup.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BurnupConfig {
    /// Sprint used when none is named on the command line
    #[serde(default)]
    pub current: Option<String>,

    /// Sprint definitions keyed by sprint name
    #[serde(default)]
    pub sprints: BTreeMap<String, SprintSection>,
}

/// One `[sprints.<name>]` table, as written in the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintSection {
    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    /// Committed effort in man-days
    #[serde(default, alias = "committed_man_days")]
    pub commited_man_days: f64,

    /// Stop the calendar at today's date while the sprint is running
    #[serde(default)]
    pub clamp_to_today: bool,

    /// Forced daily hours keyed by `YYYY-MM-DD`
    #[serde(default)]
    pub forced: BTreeMap<String, ForcedValue>,

    /// Planned daily hours keyed by `YYYY-MM-DD`
    #[serde(default)]
    pub planned: BTreeMap<String, f64>,

    /// Story targets; when absent the commitment is computed from issues
    #[serde(default)]
    pub targets: TargetsSection,

    /// Issue ids excluded from every computation
    #[serde(default)]
    pub ignored: Vec<String>,

    /// Prefix that starts a commit-style time entry description, followed
    /// by the story number (`"PRJ-"` matches `"prj-42 fix login"`)
    #[serde(default)]
    pub commit_prefix: Option<String>,
}

/// A forced value as written: a number replaces, a signed string adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForcedValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetsSection {
    #[serde(default)]
    pub sp: Option<f64>,
    #[serde(default)]
    pub bv: Option<f64>,
}
