//! Hours burnt per story.
//!
//! Time entries whose description starts with the sprint's commit prefix
//! and a story number (`PRJ-42 fix login`) are booked on that story; all
//! other entries go to [`OTHER_STORY`]. Each story's planned effort comes
//! from its story points and the sprint's velocity, which is committed story
//! points per committed man-day.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info_span};

use crate::config::SprintConfig;
use crate::core::{accumulate, Error, IssueEvent, Result, TimeEntry, HOURS_PER_MAN_DAY};

/// Bucket for entries that name no story
pub const OTHER_STORY: &str = "other";

/// Extracts story numbers from entry descriptions and issue ids
#[derive(Debug, Clone)]
pub struct StoryMatcher {
    description: Regex,
    issue_id: Regex,
}

impl StoryMatcher {
    /// Match descriptions starting with `prefix` (case-insensitive) and digits.
    pub fn new(prefix: &str) -> Result<Self> {
        let pattern = format!(r"(?i)^{}(\d+)", regex::escape(prefix.trim()));
        let build = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                Error::configuration(format!("Invalid commit prefix '{}': {}", prefix, e))
            })
        };

        Ok(Self {
            description: build(&pattern)?,
            issue_id: build(r"-(\d+)$")?,
        })
    }

    /// Story number named at the start of `description`, if any
    pub fn story_of<'a>(&self, description: &'a str) -> Option<&'a str> {
        self.description
            .captures(description.trim_start())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Trailing number of an issue id: `PRJ-42` gives `42`
    pub fn number_of<'a>(&self, issue_id: &'a str) -> Option<&'a str> {
        self.issue_id
            .captures(issue_id)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Burnt versus planned effort for one story
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryResult {
    pub story: String,
    pub hours_burnt: f64,
    pub md_burnt: f64,
    pub planned_md: f64,
    pub planned_hours: f64,
    /// `None` when nothing was planned for the story
    pub percent: Option<f64>,
}

impl StoryResult {
    fn new(story: String, hours_burnt: f64, story_points: f64, velocity: f64) -> Self {
        let md_burnt = hours_burnt / HOURS_PER_MAN_DAY;
        let planned_md = if velocity > 0.0 {
            story_points / velocity
        } else {
            0.0
        };
        let percent = if planned_md == 0.0 {
            None
        } else {
            Some(md_burnt / planned_md * 100.0)
        };

        Self {
            story,
            hours_burnt,
            md_burnt,
            planned_md,
            planned_hours: planned_md * HOURS_PER_MAN_DAY,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryReport {
    pub sprint: String,
    /// Committed story points per committed man-day
    pub velocity: f64,
    /// Known stories in issue order, then stories only seen in entries,
    /// then [`OTHER_STORY`]
    pub stories: Vec<StoryResult>,
    pub total_hours: f64,
    pub committed_md: f64,
    /// `None` when no man-days were committed
    pub total_percent: Option<f64>,
}

impl StoryReport {
    pub fn story(&self, story: &str) -> Option<&StoryResult> {
        self.stories.iter().find(|s| s.story == story)
    }
}

/// Compare hours booked on each story with its share of the commitment.
///
/// Only entries dated inside the sprint count. Issues listed in the sprint's
/// `ignored` set, or flagged ignored, are left out.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the sprint has no `commit_prefix`.
pub fn result_per_story(
    sprint: &SprintConfig,
    entries: &[TimeEntry],
    issues: &[IssueEvent],
) -> Result<StoryReport> {
    let prefix = sprint.commit_prefix.as_deref().ok_or_else(|| {
        Error::configuration(
            "No commit prefix found in config. Make sure it's defined in your settings file",
        )
    })?;
    let _span = info_span!("result_per_story", sprint = %sprint.name).entered();
    let matcher = StoryMatcher::new(prefix)?;

    let mut order: Vec<String> = Vec::new();
    let mut points: BTreeMap<String, f64> = BTreeMap::new();
    for issue in issues
        .iter()
        .filter(|issue| !issue.is_ignored && !sprint.ignored.contains(&issue.issue_id))
    {
        let Some(number) = matcher.number_of(&issue.issue_id) else {
            debug!(issue = %issue.issue_id, "Issue id carries no story number, skipped");
            continue;
        };
        if !points.contains_key(number) {
            order.push(number.to_string());
        }
        accumulate(&mut points, number.to_string(), issue.story_points);
    }

    let committed_points: f64 = points.values().sum();
    let velocity = if sprint.commited_man_days > 0.0 {
        committed_points / sprint.commited_man_days
    } else {
        0.0
    };

    let mut burnt: BTreeMap<String, f64> = BTreeMap::new();
    let mut outside = 0usize;
    for entry in entries {
        if entry.date < sprint.start_date || entry.date > sprint.end_date {
            outside += 1;
            continue;
        }
        let story = matcher.story_of(&entry.description).unwrap_or(OTHER_STORY);
        accumulate(&mut burnt, story.to_string(), entry.hours);
    }
    if outside > 0 {
        debug!(outside, "Time entries outside the sprint, skipped");
    }

    let known: BTreeSet<&str> = order.iter().map(String::as_str).collect();
    let unplanned: Vec<String> = burnt
        .keys()
        .filter(|story| !known.contains(story.as_str()) && story.as_str() != OTHER_STORY)
        .cloned()
        .collect();
    let other = burnt
        .contains_key(OTHER_STORY)
        .then(|| OTHER_STORY.to_string());

    let stories: Vec<StoryResult> = order
        .into_iter()
        .chain(unplanned)
        .chain(other)
        .map(|story| {
            let hours = burnt.get(&story).copied().unwrap_or(0.0);
            let story_points = points.get(&story).copied().unwrap_or(0.0);
            StoryResult::new(story, hours, story_points, velocity)
        })
        .collect();

    let total_hours: f64 = burnt.values().sum();
    let total_percent = if sprint.commited_man_days > 0.0 {
        Some(total_hours / sprint.committed_hours() * 100.0)
    } else {
        None
    };

    debug!(stories = stories.len(), velocity, total_hours, "Stories matched");

    Ok(StoryReport {
        sprint: sprint.name.clone(),
        velocity,
        stories,
        total_hours,
        committed_md: sprint.commited_man_days,
        total_percent,
    })
}
