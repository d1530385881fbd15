//! Percent-of-target normalization for chart rendering.

use serde::Serialize;

use crate::core::Metric;
use crate::cumulate::MetricSeries;

/// Cumulative series mapped onto the [0, 100] range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub metric: Metric,
    /// Effective target: never below the final cumulative value
    pub target: f64,
    pub values: Vec<f64>,
}

impl NormalizedSeries {
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Effective target for a series: the configured target, raised to the
/// final cumulative value when the sprint achieved more than committed.
pub fn effective_target(series: &MetricSeries, configured_target: f64) -> f64 {
    configured_target.max(series.last())
}

/// Normalize `series` against `configured_target`.
///
/// Returns `None` when the effective target is zero (nothing committed and
/// nothing achieved); such a metric is left out of the chart entirely.
/// Values are not rounded here.
pub fn normalize(series: &MetricSeries, configured_target: f64) -> Option<NormalizedSeries> {
    let target = effective_target(series, configured_target);
    if target == 0.0 {
        return None;
    }

    Some(NormalizedSeries {
        metric: series.metric,
        target,
        values: series
            .values
            .iter()
            .map(|value| value / target * 100.0)
            .collect(),
    })
}
