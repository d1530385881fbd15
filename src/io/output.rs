use crate::core::{Metric, HOURS_PER_MAN_DAY};
use crate::formatting::{FormattingConfig, OutputFormatter};
use crate::per_story::StoryReport;
use crate::report::{BurnupReport, DayBreakdown, MetricSummary};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &BurnupReport) -> anyhow::Result<()>;
    fn write_story_report(&mut self, report: &StoryReport) -> anyhow::Result<()>;
}

/// `value / target` line as shown in final-result displays
fn summary_line(summary: &MetricSummary) -> String {
    let label = summary.metric.key().to_uppercase();
    match summary.percent {
        Some(percent) => format!(
            "{} {:.0}% ({:.0}/{:.0})",
            label, percent, summary.achieved_total, summary.target_total
        ),
        None => format!("{} - (no target)", label),
    }
}

fn percent_cell(report: &BurnupReport, metric: Metric, row: usize) -> String {
    report
        .normalized_for(metric)
        .and_then(|series| series.values.get(row))
        .map_or_else(|| "-".to_string(), |p| format!("{:.1}%", p))
}

fn optional_percent(percent: Option<f64>) -> String {
    percent.map_or_else(|| "-".to_string(), |p| format!("{:.0}%", p))
}

/// `burnt/planned MD (burnt/planned hours) percent`, tab separated
fn story_line(label: &str, md: (f64, f64), hours: (f64, f64), percent: Option<f64>) -> String {
    format!(
        "{}\t{:.2}/{:.1} MD\t({:.0}/{:.0} hours)\t{}",
        label,
        md.0,
        md.1,
        hours.0,
        hours.1,
        optional_percent(percent)
    )
}

fn forced_label(day: &DayBreakdown) -> Option<String> {
    day.forced.map(|forced| match forced {
        crate::grouping::ForcedOverride::Replace(v) => format!("forced to {}", v),
        crate::grouping::ForcedOverride::Delta(d) => format!("forced {:+}", d),
    })
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_story_report(&mut self, report: &StoryReport) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
    verbosity: u8,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, verbosity: u8) -> Self {
        Self { writer, verbosity }
    }

    fn write_header(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Sprint Burnup: {}", report.sprint)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Calendar: {} to {}",
            report.calendar_start, report.calendar_end
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Final Result")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Achieved | Target | Percent |")?;
        writeln!(self.writer, "|--------|----------|--------|---------|")?;
        for summary in &report.summary {
            let percent = summary
                .percent
                .map_or_else(|| "-".to_string(), |p| format!("{:.0}%", p));
            writeln!(
                self.writer,
                "| {} | {:.1} | {:.1} | {} |",
                summary.metric.key().to_uppercase(),
                summary.achieved_total,
                summary.target_total,
                percent
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_series(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Burnup")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Date | MD | SP | BV | PLANNED |")?;
        writeln!(self.writer, "|------|----|----|----|---------|")?;
        for (row, date) in report.dates.iter().enumerate() {
            let cells: Vec<String> = Metric::ALL
                .iter()
                .map(|metric| percent_cell(report, *metric, row))
                .collect();
            writeln!(self.writer, "| {} | {} |", date, cells.join(" | "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_days(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Daily Hours")?;
        writeln!(self.writer)?;
        for day in &report.days {
            writeln!(self.writer, "### {}", day.date)?;
            writeln!(self.writer)?;
            for (user, hours) in &day.hours_by_user {
                writeln!(self.writer, "- {}: {}", user, hours)?;
            }
            match forced_label(day) {
                Some(label) => writeln!(
                    self.writer,
                    "- Total: {} ({}, logged {})",
                    day.effective_hours, label, day.natural_hours
                )?,
                None => writeln!(self.writer, "- Total: {}", day.effective_hours)?,
            }
            if let Some(planned) = day.planned {
                writeln!(self.writer, "- Planned: {}", planned)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_summary(report)?;
        self.write_series(report)?;
        if self.verbosity > 0 {
            self.write_days(report)?;
        }
        Ok(())
    }

    fn write_story_report(&mut self, report: &StoryReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Result per Story: {}", report.sprint)?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Planned velocity: {:.2} sp per man-day", report.velocity)?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Story | MD burnt | MD planned | Hours burnt | Hours planned | Percent |"
        )?;
        writeln!(
            self.writer,
            "|-------|----------|------------|-------------|---------------|---------|"
        )?;
        for story in &report.stories {
            writeln!(
                self.writer,
                "| {} | {:.2} | {:.1} | {:.0} | {:.0} | {} |",
                story.story,
                story.md_burnt,
                story.planned_md,
                story.hours_burnt,
                story.planned_hours,
                optional_percent(story.percent)
            )?;
        }
        writeln!(
            self.writer,
            "| **Total** | {:.2} | {:.1} | {:.0} | {:.0} | {} |",
            report.total_hours / HOURS_PER_MAN_DAY,
            report.committed_md,
            report.total_hours,
            report.committed_md * HOURS_PER_MAN_DAY,
            optional_percent(report.total_percent)
        )?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatter: Box<dyn OutputFormatter>,
    verbosity: u8,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, formatting: FormattingConfig, verbosity: u8) -> Self {
        Self {
            writer,
            formatter: formatting.formatter(),
            verbosity,
        }
    }

    fn write_days(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        for day in &report.days {
            writeln!(self.writer, "{}", self.formatter.bold(&day.date.to_string()))?;
            for (user, hours) in &day.hours_by_user {
                writeln!(self.writer, "  {} : {}", user, hours)?;
            }

            let planned = day
                .planned
                .map(|p| format!(" (Planned: {})", p))
                .unwrap_or_default();
            if day.is_forced() {
                writeln!(
                    self.writer,
                    "  Total (without forced data): {}",
                    day.natural_hours
                )?;
                writeln!(
                    self.writer,
                    "  Total including forced data: {}{}",
                    day.effective_hours, planned
                )?;
            } else {
                writeln!(self.writer, "  Total: {}{}", day.effective_hours, planned)?;
            }
            if let Some(achievement) = day.achievement {
                writeln!(
                    self.writer,
                    "  {}",
                    self.formatter.dim(&format!(
                        "Closed: {} sp, {} bv",
                        achievement.story_points, achievement.business_value
                    ))
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &BurnupReport) -> anyhow::Result<()> {
        let title = format!(
            "Sprint burnup: {} ({} to {})",
            report.sprint, report.calendar_start, report.calendar_end
        );
        writeln!(self.writer, "{}", self.formatter.header(&title))?;
        writeln!(self.writer)?;

        if self.verbosity > 0 {
            self.write_days(report)?;
        }

        writeln!(self.writer, "{:<12}{:>10}{:>10}{:>10}{:>10}", "Date", "MD", "SP", "BV", "PLANNED")?;
        for (row, date) in report.dates.iter().enumerate() {
            let cells: String = Metric::ALL
                .iter()
                .map(|metric| format!("{:>10}", percent_cell(report, *metric, row)))
                .collect();
            writeln!(self.writer, "{:<12}{}", date.to_string(), cells)?;
        }
        if report.dates.is_empty() {
            writeln!(self.writer, "{}", self.formatter.dim("No activity recorded yet"))?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "{}", self.formatter.bold("Final result"))?;
        for summary in &report.summary {
            let line = summary_line(summary);
            let styled = match summary.percent {
                Some(percent) => self.formatter.progress(percent, &line),
                None => self.formatter.dim(&line),
            };
            writeln!(self.writer, "  {}", styled)?;
        }
        Ok(())
    }

    fn write_story_report(&mut self, report: &StoryReport) -> anyhow::Result<()> {
        let title = format!(
            "Results per story: {} (planned velocity {:.2})",
            report.sprint, report.velocity
        );
        writeln!(self.writer, "{}", self.formatter.header(&title))?;
        writeln!(self.writer)?;

        for story in &report.stories {
            let line = story_line(
                &story.story,
                (story.md_burnt, story.planned_md),
                (story.hours_burnt, story.planned_hours),
                story.percent,
            );
            let styled = match story.percent {
                Some(percent) => self.formatter.progress(percent, &line),
                None => self.formatter.dim(&line),
            };
            writeln!(self.writer, "{}", styled)?;
        }
        if report.stories.is_empty() {
            writeln!(self.writer, "{}", self.formatter.dim("No stories or hours found"))?;
        }
        writeln!(self.writer)?;

        let total = story_line(
            "Total",
            (report.total_hours / HOURS_PER_MAN_DAY, report.committed_md),
            (report.total_hours, report.committed_md * HOURS_PER_MAN_DAY),
            report.total_percent,
        );
        writeln!(self.writer, "{}", self.formatter.bold(&total))?;
        Ok(())
    }
}

pub fn create_writer<'a>(
    format: OutputFormat,
    writer: Box<dyn Write + 'a>,
    formatting: FormattingConfig,
    verbosity: u8,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer, verbosity)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting, verbosity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievement::Achievement;
    use crate::grouping::ForcedOverride;
    use crate::normalize::NormalizedSeries;
    use crate::per_story::StoryResult;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn sample_report() -> BurnupReport {
        BurnupReport {
            sprint: "sprint-12".to_string(),
            calendar_start: day(3),
            calendar_end: day(5),
            dates: vec![day(3), day(5)],
            cumulative: BTreeMap::from([(Metric::Md, vec![4.0, 10.0])]),
            normalized: BTreeMap::from([(
                Metric::Md,
                NormalizedSeries {
                    metric: Metric::Md,
                    target: 80.0,
                    values: vec![5.0, 12.5],
                },
            )]),
            summary: vec![
                MetricSummary::new(Metric::Md, 10.0, 80.0),
                MetricSummary::new(Metric::Sp, 0.0, 0.0),
            ],
            days: vec![
                DayBreakdown {
                    date: day(3),
                    natural_hours: 4.0,
                    effective_hours: 4.0,
                    hours_by_user: BTreeMap::from([("alice".to_string(), 4.0)]),
                    forced: None,
                    planned: Some(8.0),
                    achievement: None,
                },
                DayBreakdown {
                    date: day(5),
                    natural_hours: 4.0,
                    effective_hours: 6.0,
                    hours_by_user: BTreeMap::from([("bob".to_string(), 4.0)]),
                    forced: Some(ForcedOverride::Delta(2.0)),
                    planned: None,
                    achievement: Some(Achievement::default()),
                },
            ],
        }
    }

    fn render(format: OutputFormat, verbosity: u8) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = create_writer(
                format,
                Box::new(&mut buffer),
                FormattingConfig::plain(),
                verbosity,
            );
            writer.write_report(&sample_report()).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    fn sample_story_report() -> StoryReport {
        StoryReport {
            sprint: "sprint-12".to_string(),
            velocity: 2.0,
            stories: vec![
                StoryResult {
                    story: "1".to_string(),
                    hours_burnt: 12.0,
                    md_burnt: 1.5,
                    planned_md: 3.0,
                    planned_hours: 24.0,
                    percent: Some(50.0),
                },
                StoryResult {
                    story: "other".to_string(),
                    hours_burnt: 2.0,
                    md_burnt: 0.25,
                    planned_md: 0.0,
                    planned_hours: 0.0,
                    percent: None,
                },
            ],
            total_hours: 14.0,
            committed_md: 4.0,
            total_percent: Some(43.75),
        }
    }

    fn render_stories(format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer =
                create_writer(format, Box::new(&mut buffer), FormattingConfig::plain(), 0);
            writer.write_story_report(&sample_story_report()).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_terminal_story_report() {
        let output = render_stories(OutputFormat::Terminal);
        assert!(output.contains("Results per story: sprint-12 (planned velocity 2.00)"));
        assert!(output.contains("1\t1.50/3.0 MD\t(12/24 hours)\t50%"));
        assert!(output.contains("other\t0.25/0.0 MD\t(2/0 hours)\t-"));
        assert!(output.contains("Total\t1.75/4.0 MD\t(14/32 hours)\t44%"));
    }

    #[test]
    fn test_markdown_story_report() {
        let output = render_stories(OutputFormat::Markdown);
        assert!(output.contains("| 1 | 1.50 | 3.0 | 12 | 24 | 50% |"));
        assert!(output.contains("| **Total** | 1.75 | 4.0 | 14 | 32 | 44% |"));
    }

    #[test]
    fn test_json_story_report() {
        let value: serde_json::Value =
            serde_json::from_str(&render_stories(OutputFormat::Json)).unwrap();
        assert_eq!(value["stories"][0]["planned_hours"], 24.0);
        assert!(value["stories"][1]["percent"].is_null());
    }

    #[test]
    fn test_summary_line() {
        let line = summary_line(&MetricSummary::new(Metric::Md, 64.0, 80.0));
        assert_eq!(line, "MD 80% (8/10)");
        let none = summary_line(&MetricSummary::new(Metric::Bv, 0.0, 0.0));
        assert_eq!(none, "BV - (no target)");
    }

    #[test]
    fn test_terminal_output_lists_dates_and_omitted_metrics() {
        let output = render(OutputFormat::Terminal, 0);
        assert!(output.contains("Sprint burnup: sprint-12 (2024-06-03 to 2024-06-05)"));
        assert!(output.contains("2024-06-05"));
        assert!(output.contains("12.5%"));
        assert!(output.contains("SP - (no target)"));
        assert!(!output.contains("alice"));
    }

    #[test]
    fn test_verbose_terminal_output_shows_forced_totals() {
        let output = render(OutputFormat::Terminal, 1);
        assert!(output.contains("  alice : 4"));
        assert!(output.contains("Total: 4 (Planned: 8)"));
        assert!(output.contains("Total (without forced data): 4"));
        assert!(output.contains("Total including forced data: 6"));
    }

    #[test]
    fn test_markdown_output() {
        let output = render(OutputFormat::Markdown, 1);
        assert!(output.starts_with("# Sprint Burnup: sprint-12"));
        assert!(output.contains("| 2024-06-03 | 5.0% | - | - | - |"));
        assert!(output.contains("- Total: 6 (forced +2, logged 4)"));
    }

    #[test]
    fn test_json_output_uses_metric_keys() {
        let output = render(OutputFormat::Json, 0);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["normalized"]["md"]["values"][1], 12.5);
        assert_eq!(value["summary"][0]["metric"], "md");
        assert_eq!(value["days"][1]["forced"]["kind"], "delta");
    }
}
