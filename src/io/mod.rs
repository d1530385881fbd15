pub mod output;

pub use output::{create_writer, OutputFormat, OutputWriter};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::core::{IssueEvent, TimeEntry};

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

fn read_json_array<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let contents = read_file(path)
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
    let items: Vec<T> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {} in {}", what, path.display()))?;
    log::debug!("Read {} {} from {}", items.len(), what, path.display());
    Ok(items)
}

/// Time entries exported by the time-tracking collaborator
pub fn read_time_entries(path: Option<&Path>) -> Result<Vec<TimeEntry>> {
    path.map_or_else(|| Ok(Vec::new()), |p| read_json_array(p, "time entries"))
}

/// Issue events exported by the issue-tracker collaborator
pub fn read_issue_events(path: Option<&Path>) -> Result<Vec<IssueEvent>> {
    path.map_or_else(|| Ok(Vec::new()), |p| read_json_array(p, "issue events"))
}
