//! Closed-story achievement indexed by closing day.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::ops::AddAssign;

use crate::core::{IssueEvent, StoryMetric};

/// Story points and business value closed on one day
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Achievement {
    pub story_points: f64,
    pub business_value: f64,
}

impl Achievement {
    pub fn of(event: &IssueEvent) -> Self {
        Self {
            story_points: event.story_points,
            business_value: event.business_value,
        }
    }

    pub fn get(&self, metric: StoryMetric) -> f64 {
        match metric {
            StoryMetric::StoryPoints => self.story_points,
            StoryMetric::BusinessValue => self.business_value,
        }
    }
}

impl AddAssign for Achievement {
    fn add_assign(&mut self, other: Self) {
        self.story_points += other.story_points;
        self.business_value += other.business_value;
    }
}

/// Pre-indexed achievement for O(1) per-day lookups
///
/// Only days with at least one closed issue have an entry. A missing day
/// means nothing was closed that day; the cumulated total carries forward.
#[derive(Debug, Clone, Default)]
pub struct AchievementIndex {
    by_day: HashMap<NaiveDate, Achievement>,
}

impl AchievementIndex {
    /// Build the index from issue events (O(n) operation)
    pub fn index(events: &[IssueEvent]) -> Self {
        let mut by_day: HashMap<NaiveDate, Achievement> = HashMap::new();

        for (day, event) in events
            .iter()
            .filter(|event| !event.is_ignored)
            .filter_map(|event| event.closed_on().map(|day| (day, event)))
        {
            *by_day.entry(day).or_default() += Achievement::of(event);
        }

        Self { by_day }
    }

    pub fn lookup(&self, day: NaiveDate) -> Option<Achievement> {
        self.by_day.get(&day).copied()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_day.keys().copied()
    }

    /// Sum of everything indexed, across all days
    pub fn total(&self, metric: StoryMetric) -> f64 {
        self.by_day.values().map(|a| a.get(metric)).sum()
    }

    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

/// Committed total: every non-ignored, non-nice-to-have issue, in any state.
pub fn commitment(events: &[IssueEvent], metric: StoryMetric) -> f64 {
    events
        .iter()
        .filter(|event| !event.is_ignored && !event.is_nice_to_have)
        .map(|event| metric.of(event))
        .sum()
}

/// Achieved total over closed issues, including those without a close date.
pub fn achieved(events: &[IssueEvent], metric: StoryMetric) -> f64 {
    events
        .iter()
        .filter(|event| !event.is_ignored && event.is_closed)
        .map(|event| metric.of(event))
        .sum()
}
