//! The burnup report handed to output writers and chart renderers.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::achievement::Achievement;
use crate::core::{Metric, HOURS_PER_MAN_DAY};
use crate::grouping::ForcedOverride;
use crate::normalize::NormalizedSeries;

/// Final result for one metric, for ratio and pie displays
///
/// Man-day totals are expressed in man-days, not hours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub achieved_total: f64,
    pub target_total: f64,
    /// `None` when the target is zero
    pub percent: Option<f64>,
}

impl MetricSummary {
    /// Build a summary from the final cumulative value and effective target,
    /// both in the metric's cumulation unit.
    pub fn new(metric: Metric, achieved: f64, target: f64) -> Self {
        let scale = match metric {
            Metric::Md => HOURS_PER_MAN_DAY,
            _ => 1.0,
        };
        let percent = if target == 0.0 {
            None
        } else {
            Some(achieved / target * 100.0)
        };

        Self {
            metric,
            achieved_total: achieved / scale,
            target_total: target / scale,
            percent,
        }
    }
}

/// Everything known about one plotted day, for verbose output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBreakdown {
    pub date: NaiveDate,
    pub natural_hours: f64,
    pub effective_hours: f64,
    pub hours_by_user: BTreeMap<String, f64>,
    pub forced: Option<ForcedOverride>,
    pub planned: Option<f64>,
    pub achievement: Option<Achievement>,
}

impl DayBreakdown {
    pub fn is_forced(&self) -> bool {
        self.forced.is_some()
    }
}

/// Complete output of one burnup run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnupReport {
    pub sprint: String,
    pub calendar_start: NaiveDate,
    pub calendar_end: NaiveDate,
    /// Plotted dates; every series below is parallel to this
    pub dates: Vec<NaiveDate>,
    /// Raw cumulative values (man-days in hours)
    pub cumulative: BTreeMap<Metric, Vec<f64>>,
    /// Percent series; metrics with a zero target are absent
    pub normalized: BTreeMap<Metric, NormalizedSeries>,
    pub summary: Vec<MetricSummary>,
    pub days: Vec<DayBreakdown>,
}

impl BurnupReport {
    pub fn summary_for(&self, metric: Metric) -> Option<&MetricSummary> {
        self.summary.iter().find(|s| s.metric == metric)
    }

    pub fn normalized_for(&self, metric: Metric) -> Option<&NormalizedSeries> {
        self.normalized.get(&metric)
    }

    /// Suggested output file stem: `sprint_burnup-<slug>-<YYYYMMDD>`
    pub fn file_stem(&self, generated_on: NaiveDate) -> String {
        format!(
            "sprint_burnup-{}-{}",
            slugify(&self.sprint),
            generated_on.format("%Y%m%d")
        )
    }
}

/// Lowercase, alphanumerics kept, every other run collapsed to one `-`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
