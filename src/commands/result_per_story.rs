use anyhow::Result;
use std::path::PathBuf;

use crate::commands::sprint::open_sink;
use crate::config::load_config;
use crate::formatting::FormattingConfig;
use crate::io::{self, create_writer, OutputFormat};
use crate::per_story::result_per_story;

pub struct StoryCommandConfig {
    pub name: Option<String>,
    pub config: Option<PathBuf>,
    pub entries: Option<PathBuf>,
    pub issues: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

pub fn run_result_per_story(config: StoryCommandConfig) -> Result<()> {
    let burnup_config = load_config(config.config.as_deref())?;
    let sprint = burnup_config.sprint(config.name.as_deref())?;

    let entries = io::read_time_entries(config.entries.as_deref())?;
    let issues = io::read_issue_events(config.issues.as_deref())?;
    let report = result_per_story(&sprint, &entries, &issues)?;

    let formatting = if config.output.is_some() {
        FormattingConfig::plain()
    } else {
        config.formatting
    };
    let sink = open_sink(config.output.as_deref())?;
    let mut writer = create_writer(config.format, sink, formatting, 0);
    writer.write_story_report(&report)
}
