use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = r#"# Burnup Configuration

# Sprint used when none is named on the command line
current = "sprint-1"

[sprints.sprint-1]
start_date = "2024-06-03"
end_date = "2024-06-14"
commited_man_days = 10
# Stop the calendar at today's date while the sprint is running
clamp_to_today = true
# Issue ids left out of commitment and achievement
ignored = []

# Story targets; computed from the issues when omitted
[sprints.sprint-1.targets]
# sp = 20
# bv = 40

# Manual corrections of logged hours: a number replaces the day's total,
# a signed string ("+2", "-1.5") adjusts it
# An unsigned string ("5") also replaces; write "+5" to add 5 hours
[sprints.sprint-1.forced]
# "2024-06-04" = 5
# "2024-06-05" = "+2"

# Planned hours per day
[sprints.sprint-1.planned]
# "2024-06-03" = 16
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force).map(|path| {
        println!("Created {} configuration file", path.display());
    })
}

pub(crate) fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, TEMPLATE)?;
    Ok(config_path)
}
