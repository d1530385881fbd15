use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::formatting::FormattingConfig;
use crate::io::{self, create_writer, OutputFormat};
use crate::pipeline::{run_burnup, BurnupInputs};
use crate::report::BurnupReport;

pub struct SprintCommandConfig {
    pub name: Option<String>,
    pub config: Option<PathBuf>,
    pub entries: Option<PathBuf>,
    pub issues: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub today: NaiveDate,
    pub verbosity: u8,
    pub formatting: FormattingConfig,
}

fn extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Terminal => "txt",
    }
}

/// An existing directory receives a file named after the sprint and date.
fn output_path(output: &Path, report: &BurnupReport, config: &SprintCommandConfig) -> PathBuf {
    if output.is_dir() {
        output.join(format!(
            "{}.{}",
            report.file_stem(config.today),
            extension(config.format)
        ))
    } else {
        output.to_path_buf()
    }
}

/// Buffered file at `path`, or stdout when there is none
pub(crate) fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            log::info!("Writing report to {}", path.display());
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}

fn write_report(report: &BurnupReport, config: &SprintCommandConfig) -> Result<()> {
    let path = config
        .output
        .as_deref()
        .map(|output| output_path(output, report, config));
    let sink = open_sink(path.as_deref())?;

    // Colors only make sense on a terminal
    let formatting = if config.output.is_some() {
        FormattingConfig::plain()
    } else {
        config.formatting
    };

    let mut writer = create_writer(config.format, sink, formatting, config.verbosity);
    writer.write_report(report)
}

pub fn run_sprint(config: SprintCommandConfig) -> Result<()> {
    let burnup_config = load_config(config.config.as_deref())?;
    let sprint = burnup_config.sprint(config.name.as_deref())?;

    let entries = io::read_time_entries(config.entries.as_deref())?;
    let issues = io::read_issue_events(config.issues.as_deref())?;

    let report = run_burnup(BurnupInputs {
        sprint: &sprint,
        entries: &entries,
        issues: &issues,
        today: config.today,
    })?;

    write_report(&report, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn command(dir: &Path, output: Option<PathBuf>) -> SprintCommandConfig {
        SprintCommandConfig {
            name: None,
            config: Some(dir.join(".burnup.toml")),
            entries: None,
            issues: None,
            format: OutputFormat::Json,
            output,
            today: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            verbosity: 0,
            formatting: FormattingConfig::plain(),
        }
    }

    fn write_config(dir: &Path) {
        fs::write(
            dir.join(".burnup.toml"),
            "[sprints.\"Sprint 12\"]\nstart_date = \"2024-06-03\"\nend_date = \"2024-06-05\"\ncommited_man_days = 1\n",
        )
        .unwrap();
    }

    #[test]
    fn test_output_directory_gets_generated_file_name() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path());

        run_sprint(command(temp_dir.path(), Some(temp_dir.path().to_path_buf()))).unwrap();

        let expected = temp_dir.path().join("sprint_burnup-sprint-12-20240620.json");
        let contents = fs::read_to_string(expected).unwrap();
        assert!(contents.contains("\"sprint\": \"Sprint 12\""));
    }

    #[test]
    fn test_unknown_sprint_fails() {
        let temp_dir = TempDir::new().unwrap();
        write_config(temp_dir.path());

        let mut config = command(temp_dir.path(), Some(temp_dir.path().join("out.json")));
        config.name = Some("nope".to_string());

        let err = run_sprint(config).unwrap_err();
        assert!(err.to_string().contains("Sprint nope not found"));
    }
}
