//! Running totals over the sprint calendar.
//!
//! The cumulator walks the calendar once. A day is emitted only when it
//! carries some signal (hours, a closed story, or a planned amount); every
//! metric then adds that day's amount to its previous total, so a day with
//! nothing new for a metric carries the last value forward.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::achievement::AchievementIndex;
use crate::calendar::CalendarRange;
use crate::core::{Error, FactKind, Metric, Result};
use crate::grouping::DailyHours;

/// Cumulative values for one metric, parallel to [`BurnupSeries::dates`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub values: Vec<f64>,
}

impl MetricSeries {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            values: Vec::new(),
        }
    }

    /// Last cumulative value, 0 for an empty series
    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    fn push(&mut self, date: NaiveDate, amount: Option<f64>) -> Result<()> {
        let amount = amount.unwrap_or(0.0);
        if amount < 0.0 {
            return Err(Error::NegativeAmount {
                metric: self.metric,
                date,
                amount,
            });
        }
        let next = self.last() + amount;
        self.values.push(next);
        Ok(())
    }
}

/// Filtered sprint dates and one cumulative series per metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnupSeries {
    pub dates: Vec<NaiveDate>,
    pub series: BTreeMap<Metric, MetricSeries>,
}

impl BurnupSeries {
    pub fn get(&self, metric: Metric) -> Option<&MetricSeries> {
        self.series.get(&metric)
    }
}

/// Cumulate every metric over the signal-bearing days of `calendar`.
///
/// Man-days are cumulated in hours; conversion happens at reporting time.
///
/// # Errors
///
/// - [`Error::MissingCalendarDate`] if an achievement day or a forced
///   override falls outside the calendar.
/// - [`Error::NegativeAmount`] if any day would decrease a series.
pub fn cumulate(
    calendar: &CalendarRange,
    daily_hours: &DailyHours,
    achievement: &AchievementIndex,
    planned: &BTreeMap<NaiveDate, f64>,
) -> Result<BurnupSeries> {
    let mut achievement_days: Vec<NaiveDate> = achievement.days().collect();
    achievement_days.sort();
    for date in achievement_days {
        calendar.ensure_contains(date, FactKind::Achievement)?;
    }
    for date in daily_hours.override_dates() {
        calendar.ensure_contains(date, FactKind::ForcedOverride)?;
    }
    for date in planned.keys().filter(|date| !calendar.contains(**date)) {
        debug!(%date, "Planned amount outside the calendar, skipped");
    }

    let mut dates = Vec::new();
    let mut series: BTreeMap<Metric, MetricSeries> = Metric::ALL
        .iter()
        .map(|metric| (*metric, MetricSeries::new(*metric)))
        .collect();

    for date in calendar.iter() {
        let hours = daily_hours.effective(date);
        let achieved = achievement.lookup(date);
        let planned_hours = planned.get(&date).copied();

        if hours == 0.0 && achieved.is_none() && planned_hours.is_none() {
            continue;
        }

        dates.push(date);
        for (metric, values) in series.iter_mut() {
            let amount = match metric {
                Metric::Md => Some(hours),
                Metric::Sp => achieved.map(|a| a.story_points),
                Metric::Bv => achieved.map(|a| a.business_value),
                Metric::Planned => planned_hours,
            };
            values.push(date, amount)?;
        }
    }

    debug!(
        calendar_days = calendar.len(),
        plotted_days = dates.len(),
        "Cumulated burnup series"
    );

    Ok(BurnupSeries { dates, series })
}
