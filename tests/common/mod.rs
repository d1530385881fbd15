// Test utility module for burnup integration tests
#![allow(dead_code)]

use burnup::{IssueEvent, SprintConfig, TimeEntry};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::process::Command;

/// A day in June 2024, the month every fixture sprint lives in
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).expect("valid June date")
}

pub fn entry(user: &str, d: u32, hours: f64) -> TimeEntry {
    TimeEntry {
        user: user.to_string(),
        date: day(d),
        hours,
        description: String::new(),
    }
}

// Issue fixture builder
#[derive(Debug, Clone)]
pub struct IssueFixture {
    event: IssueEvent,
}

impl IssueFixture {
    pub fn new(id: &str) -> Self {
        Self {
            event: IssueEvent {
                issue_id: id.to_string(),
                story_points: 0.0,
                business_value: 0.0,
                is_closed: false,
                is_nice_to_have: false,
                is_ignored: false,
                close_date: None,
            },
        }
    }

    pub fn sp(mut self, points: f64) -> Self {
        self.event.story_points = points;
        self
    }

    pub fn bv(mut self, value: f64) -> Self {
        self.event.business_value = value;
        self
    }

    pub fn closed_on(mut self, d: u32) -> Self {
        self.event.is_closed = true;
        self.event.close_date = Some(day(d));
        self
    }

    pub fn nice_to_have(mut self) -> Self {
        self.event.is_nice_to_have = true;
        self
    }

    pub fn build(self) -> IssueEvent {
        self.event
    }
}

/// Sprint over June `from..=to` without overrides or targets
pub fn sprint(from: u32, to: u32, man_days: f64) -> SprintConfig {
    SprintConfig::new("sprint-12", day(from), day(to), man_days)
}

// Binary execution result for tests that need to verify CLI behavior
#[derive(Debug)]
pub struct BinaryResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run the `burnup` binary from `dir` with color disabled.
pub fn run_burnup_binary(dir: &Path, args: &[&str]) -> BinaryResult {
    run_burnup_binary_with_env(dir, args, &[])
}

/// Like [`run_burnup_binary`], with extra environment variables set.
pub fn run_burnup_binary_with_env(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> BinaryResult {
    let output = Command::new(env!("CARGO_BIN_EXE_burnup"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("BURNUP_CONFIG")
        .envs(envs.iter().copied())
        .output()
        .expect("Failed to execute burnup");

    BinaryResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
    }
}

// Helper to write fixture files into a temporary directory
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture file");
    path
}
