//! Burnup aggregation pipeline.
//!
//! Single entry point that wires calendar, grouping, achievement,
//! cumulation and normalization together. Inputs are fully materialized
//! snapshots; the pipeline performs no I/O and holds no state between runs.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, info, info_span, warn};

use crate::achievement::{achieved, commitment, AchievementIndex};
use crate::calendar::CalendarRange;
use crate::config::SprintConfig;
use crate::core::{IssueEvent, Metric, Result, StoryMetric, TimeEntry};
use crate::cumulate::{cumulate, BurnupSeries};
use crate::grouping::DailyHours;
use crate::normalize::{effective_target, normalize};
use crate::report::{BurnupReport, DayBreakdown, MetricSummary};

/// Everything one burnup run needs
#[derive(Debug, Clone, Copy)]
pub struct BurnupInputs<'a> {
    pub sprint: &'a SprintConfig,
    pub entries: &'a [TimeEntry],
    pub issues: &'a [IssueEvent],
    /// Date used by the clamp-to-today policy
    pub today: NaiveDate,
}

/// Configured target per metric, in cumulation units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targets {
    pub md_hours: f64,
    pub sp: f64,
    pub bv: f64,
}

impl Targets {
    /// Man-day target from the sprint; story targets from configuration
    /// when set, otherwise from the issues' commitment.
    pub fn resolve(sprint: &SprintConfig, issues: &[IssueEvent]) -> Self {
        Self {
            md_hours: sprint.committed_hours(),
            sp: sprint
                .targets
                .sp
                .unwrap_or_else(|| commitment(issues, StoryMetric::StoryPoints)),
            bv: sprint
                .targets
                .bv
                .unwrap_or_else(|| commitment(issues, StoryMetric::BusinessValue)),
        }
    }

    /// `planned` has no configured target; its own final value is used.
    pub fn for_metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Md => self.md_hours,
            Metric::Sp => self.sp,
            Metric::Bv => self.bv,
            Metric::Planned => 0.0,
        }
    }
}

/// Mark issues listed in the sprint's `ignored` set as ignored.
fn apply_ignored<'a>(sprint: &SprintConfig, issues: &'a [IssueEvent]) -> Cow<'a, [IssueEvent]> {
    if sprint.ignored.is_empty() {
        return Cow::Borrowed(issues);
    }

    Cow::Owned(
        issues
            .iter()
            .map(|issue| {
                let mut issue = issue.clone();
                issue.is_ignored |= sprint.ignored.contains(&issue.issue_id);
                issue
            })
            .collect(),
    )
}

/// Closed issues the chart cannot place because they carry no close date
fn undated_closures(issues: &[IssueEvent]) -> usize {
    issues
        .iter()
        .filter(|issue| !issue.is_ignored && issue.is_closed && issue.close_date.is_none())
        .count()
}

fn warn_on_undated_closures(issues: &[IssueEvent], index: &AchievementIndex) {
    let undated = undated_closures(issues);
    if undated == 0 {
        return;
    }

    warn!(
        undated,
        sp_total = achieved(issues, StoryMetric::StoryPoints),
        sp_plotted = index.total(StoryMetric::StoryPoints),
        bv_total = achieved(issues, StoryMetric::BusinessValue),
        bv_plotted = index.total(StoryMetric::BusinessValue),
        "Closed issues without a close date are missing from the chart"
    );
}

fn day_breakdowns(
    series: &BurnupSeries,
    hours: &DailyHours,
    index: &AchievementIndex,
    planned: &BTreeMap<NaiveDate, f64>,
) -> Vec<DayBreakdown> {
    series
        .dates
        .iter()
        .map(|date| DayBreakdown {
            date: *date,
            natural_hours: hours.natural(*date),
            effective_hours: hours.effective(*date),
            hours_by_user: hours.hours_by_user(*date).cloned().unwrap_or_default(),
            forced: hours.override_for(*date),
            planned: planned.get(date).copied(),
            achievement: index.lookup(*date),
        })
        .collect()
}

/// Run the full burnup aggregation for one sprint.
///
/// Fails on the first structural violation (invalid range, facts outside
/// the calendar, negative amounts); no partial report is produced.
pub fn run_burnup(inputs: BurnupInputs<'_>) -> Result<BurnupReport> {
    let BurnupInputs {
        sprint,
        entries,
        issues,
        today,
    } = inputs;

    let span = info_span!(
        "burnup",
        sprint = %sprint.name,
        entries = entries.len(),
        issues = issues.len(),
    );
    let _guard = span.enter();

    info!("Starting burnup aggregation");

    let issues = apply_ignored(sprint, issues);

    let calendar = {
        let _span = info_span!("calendar").entered();
        let calendar = CalendarRange::build_as_of(
            sprint.start_date,
            sprint.end_date,
            sprint.clamp_to_today,
            today,
        )?;
        debug!(
            start = %calendar.start(),
            end = %calendar.end(),
            days = calendar.len(),
            "Calendar built"
        );
        calendar
    };

    let hours = {
        let _span = info_span!("grouping").entered();
        let hours = DailyHours::group(entries, &sprint.forced);
        debug!(forced = sprint.forced.len(), "Daily hours grouped");
        hours
    };

    let (index, targets) = {
        let _span = info_span!("achievement").entered();
        let index = AchievementIndex::index(&issues);
        warn_on_undated_closures(&issues, &index);
        let targets = Targets::resolve(sprint, &issues);
        debug!(
            closing_days = index.len(),
            sp_target = targets.sp,
            bv_target = targets.bv,
            "Achievement indexed"
        );
        (index, targets)
    };

    let series = {
        let _span = info_span!("cumulation").entered();
        cumulate(&calendar, &hours, &index, &sprint.planned)?
    };

    let _span = info_span!("normalization").entered();

    let normalized = series
        .series
        .values()
        .filter_map(|values| {
            let result = normalize(values, targets.for_metric(values.metric));
            if result.is_none() {
                debug!(metric = %values.metric, "Zero target, metric omitted");
            }
            result.map(|n| (n.metric, n))
        })
        .collect();

    let summary = Metric::SUMMARIZED
        .iter()
        .filter_map(|metric| series.get(*metric))
        .map(|values| {
            let target = effective_target(values, targets.for_metric(values.metric));
            MetricSummary::new(values.metric, values.last(), target)
        })
        .collect();

    let days = day_breakdowns(&series, &hours, &index, &sprint.planned);

    info!(plotted_days = series.dates.len(), "Burnup aggregation complete");

    Ok(BurnupReport {
        sprint: sprint.name.clone(),
        calendar_start: calendar.start(),
        calendar_end: calendar.end(),
        cumulative: series
            .series
            .iter()
            .map(|(metric, values)| (*metric, values.values.clone()))
            .collect(),
        dates: series.dates.clone(),
        normalized,
        summary,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn issue(id: &str, sp: f64, closed: Option<u32>) -> IssueEvent {
        IssueEvent {
            issue_id: id.to_string(),
            story_points: sp,
            business_value: 0.0,
            is_closed: closed.is_some(),
            is_nice_to_have: false,
            is_ignored: false,
            close_date: closed.map(day),
        }
    }

    #[test]
    fn test_ignored_ids_from_config_are_applied() {
        let mut sprint = SprintConfig::new("s", day(3), day(5), 1.0);
        sprint.ignored.insert("B".to_string());
        let issues = vec![issue("A", 3.0, Some(4)), issue("B", 5.0, Some(4))];

        let marked = apply_ignored(&sprint, &issues);
        assert!(!marked[0].is_ignored);
        assert!(marked[1].is_ignored);
    }

    #[test]
    fn test_fractional_dated_closures_are_not_undated() {
        let mut issues = vec![
            issue("A", 0.1, Some(3)),
            issue("B", 0.2, Some(4)),
            issue("C", 0.3, Some(5)),
        ];
        assert_eq!(undated_closures(&issues), 0);

        issues.push(IssueEvent {
            close_date: None,
            ..issue("D", 1.0, Some(5))
        });
        issues.push(IssueEvent {
            is_ignored: true,
            close_date: None,
            ..issue("E", 1.0, Some(5))
        });
        assert_eq!(undated_closures(&issues), 1);
    }

    #[test]
    fn test_no_ignored_ids_borrows_input() {
        let sprint = SprintConfig::new("s", day(3), day(5), 1.0);
        let issues = vec![issue("A", 3.0, None)];
        assert!(matches!(apply_ignored(&sprint, &issues), Cow::Borrowed(_)));
    }

    #[test]
    fn test_configured_story_target_wins_over_commitment() {
        let mut sprint = SprintConfig::new("s", day(3), day(5), 2.0);
        sprint.targets.sp = Some(13.0);
        let targets = Targets::resolve(&sprint, &[issue("A", 5.0, None)]);

        assert_eq!(targets.md_hours, 16.0);
        assert_eq!(targets.sp, 13.0);
        assert_eq!(targets.bv, 0.0);
        assert_eq!(targets.for_metric(Metric::Planned), 0.0);
    }

    #[test]
    fn test_run_burnup_reports_days_and_summary() {
        let sprint = SprintConfig::new("s", day(3), day(5), 1.0);
        let entries = vec![TimeEntry {
            user: "alice".to_string(),
            date: day(3),
            hours: 4.0,
            description: String::new(),
        }];
        let issues = vec![issue("A", 3.0, Some(5)), issue("B", 2.0, None)];

        let report = run_burnup(BurnupInputs {
            sprint: &sprint,
            entries: &entries,
            issues: &issues,
            today: day(10),
        })
        .unwrap();

        assert_eq!(report.dates, vec![day(3), day(5)]);
        assert_eq!(report.days[0].hours_by_user.get("alice"), Some(&4.0));
        assert_eq!(report.days[1].achievement.unwrap().story_points, 3.0);

        let md = report.summary_for(Metric::Md).unwrap();
        assert_eq!(md.achieved_total, 0.5);
        assert_eq!(md.target_total, 1.0);
        assert_eq!(report.normalized_for(Metric::Sp).unwrap().values, vec![0.0, 60.0]);
        assert!(report.normalized_for(Metric::Bv).is_none());
        assert!(report.normalized_for(Metric::Planned).is_none());
    }
}
