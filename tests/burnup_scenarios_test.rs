//! End-to-end scenarios for the burnup pipeline, from raw entries and issue
//! events to the normalized chart series.

mod common;

use burnup::{run_burnup, BurnupInputs, BurnupReport, Error, FactKind, ForcedOverride, Metric};
use common::{day, entry, sprint, IssueFixture};
use pretty_assertions::assert_eq;

fn run(
    sprint: &burnup::SprintConfig,
    entries: &[burnup::TimeEntry],
    issues: &[burnup::IssueEvent],
) -> burnup::Result<BurnupReport> {
    run_burnup(BurnupInputs {
        sprint,
        entries,
        issues,
        today: day(30),
    })
}

#[test]
fn test_quiet_day_is_dropped_from_the_chart() {
    let sprint = sprint(3, 5, 10.0);
    let entries = vec![entry("alice", 3, 4.0), entry("bob", 5, 6.0)];

    let report = run(&sprint, &entries, &[]).unwrap();

    assert_eq!(report.dates, vec![day(3), day(5)]);
    assert_eq!(report.cumulative[&Metric::Md], vec![4.0, 10.0]);
    let md = report.normalized_for(Metric::Md).unwrap();
    assert_eq!(md.target, 80.0);
    assert_eq!(md.values, vec![5.0, 12.5]);
}

#[test]
fn test_target_equal_to_final_value_ends_at_100() {
    // 1.25 man-days = 10 hours
    let sprint = sprint(3, 5, 1.25);
    let entries = vec![entry("alice", 3, 4.0), entry("alice", 5, 6.0)];

    let report = run(&sprint, &entries, &[]).unwrap();

    assert_eq!(report.normalized_for(Metric::Md).unwrap().values, vec![40.0, 100.0]);
}

#[test]
fn test_partial_story_achievement() {
    let sprint = sprint(3, 5, 1.0);
    let issues = vec![
        IssueFixture::new("A").sp(3.0).closed_on(4).build(),
        IssueFixture::new("B").sp(2.0).build(),
    ];

    let report = run(&sprint, &[], &issues).unwrap();

    let sp = report.normalized_for(Metric::Sp).unwrap();
    assert_eq!(report.dates, vec![day(4)]);
    assert_eq!(sp.target, 5.0);
    assert_eq!(sp.last(), Some(60.0));

    let summary = report.summary_for(Metric::Sp).unwrap();
    assert_eq!(summary.achieved_total, 3.0);
    assert_eq!(summary.target_total, 5.0);
}

#[test]
fn test_overachievement_raises_the_target() {
    let sprint = sprint(3, 5, 1.0);
    let issues = vec![
        IssueFixture::new("A").bv(5.0).closed_on(3).build(),
        IssueFixture::new("N").bv(3.0).closed_on(5).nice_to_have().build(),
    ];

    let report = run(&sprint, &[], &issues).unwrap();

    let bv = report.normalized_for(Metric::Bv).unwrap();
    assert_eq!(bv.target, 8.0);
    assert_eq!(bv.values, vec![62.5, 100.0]);
    assert_eq!(report.summary_for(Metric::Bv).unwrap().percent, Some(100.0));
}

#[test]
fn test_zero_targets_are_omitted() {
    let sprint = sprint(3, 5, 0.0);

    let report = run(&sprint, &[], &[]).unwrap();

    assert!(report.dates.is_empty());
    assert!(report.normalized.is_empty());
    assert_eq!(report.summary_for(Metric::Sp).unwrap().percent, None);
}

#[test]
fn test_forced_overrides_take_precedence() {
    let mut sprint = sprint(3, 5, 10.0);
    sprint.forced.insert(day(3), ForcedOverride::Replace(5.0));
    sprint.forced.insert(day(4), ForcedOverride::Delta(2.0));
    let entries = vec![
        entry("alice", 3, 4.0),
        entry("alice", 4, 3.0),
        entry("bob", 4, 1.0),
    ];

    let report = run(&sprint, &entries, &[]).unwrap();

    assert_eq!(report.cumulative[&Metric::Md], vec![5.0, 11.0]);
    assert_eq!(report.days[0].natural_hours, 4.0);
    assert_eq!(report.days[0].effective_hours, 5.0);
    assert_eq!(report.days[1].natural_hours, 4.0);
    assert_eq!(report.days[1].effective_hours, 6.0);
    assert!(report.days[1].is_forced());
}

#[test]
fn test_additive_override_on_empty_day_adds_to_zero() {
    let mut sprint = sprint(3, 5, 10.0);
    sprint.forced.insert(day(4), ForcedOverride::Delta(2.0));

    let report = run(&sprint, &[], &[]).unwrap();

    assert_eq!(report.dates, vec![day(4)]);
    assert_eq!(report.cumulative[&Metric::Md], vec![2.0]);
}

#[test]
fn test_planned_series_is_normalized_against_itself() {
    let mut sprint = sprint(3, 5, 10.0);
    sprint.planned.insert(day(3), 16.0);
    sprint.planned.insert(day(4), 16.0);

    let report = run(&sprint, &[], &[]).unwrap();

    assert_eq!(report.cumulative[&Metric::Planned], vec![16.0, 32.0]);
    assert_eq!(
        report.normalized_for(Metric::Planned).unwrap().values,
        vec![50.0, 100.0]
    );
}

#[test]
fn test_ignored_issues_leave_commitment() {
    let mut sprint = sprint(3, 5, 1.0);
    sprint.ignored.insert("B".to_string());
    let issues = vec![
        IssueFixture::new("A").sp(3.0).closed_on(4).build(),
        IssueFixture::new("B").sp(7.0).build(),
    ];

    let report = run(&sprint, &[], &issues).unwrap();

    assert_eq!(report.normalized_for(Metric::Sp).unwrap().values, vec![100.0]);
}

#[test]
fn test_pipeline_is_idempotent() {
    let mut sprint = sprint(3, 7, 2.0);
    sprint.forced.insert(day(6), ForcedOverride::Delta(1.5));
    let entries = vec![entry("alice", 3, 6.0), entry("bob", 5, 2.0)];
    let issues = vec![IssueFixture::new("A").sp(5.0).bv(2.0).closed_on(7).build()];

    let first = run(&sprint, &entries, &issues).unwrap();
    let second = run(&sprint, &entries, &issues).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_closure_outside_calendar_is_an_error() {
    let sprint = sprint(3, 5, 1.0);
    let issues = vec![IssueFixture::new("A").sp(3.0).closed_on(10).build()];

    let err = run(&sprint, &[], &issues).unwrap_err();

    assert!(matches!(
        err,
        Error::MissingCalendarDate {
            kind: FactKind::Achievement,
            ..
        }
    ));
}

#[test]
fn test_clamped_calendar_stops_today() {
    let mut sprint = sprint(3, 14, 1.0);
    sprint.clamp_to_today = true;
    let entries = vec![entry("alice", 3, 8.0)];

    let report = run_burnup(BurnupInputs {
        sprint: &sprint,
        entries: &entries,
        issues: &[],
        today: day(4),
    })
    .unwrap();

    assert_eq!(report.calendar_end, day(4));
    assert_eq!(report.normalized_for(Metric::Md).unwrap().values, vec![100.0]);
}

#[test]
fn test_inverted_sprint_range_is_rejected() {
    let sprint = sprint(5, 3, 1.0);

    let err = run(&sprint, &[], &[]).unwrap_err();

    assert!(matches!(err, Error::InvalidRange { .. }));
}
