use anyhow::Result;
use std::path::Path;

use crate::config::{load_unvalidated_config, BurnupConfig};
use crate::formatting::FormattingConfig;

/// Check every sprint definition, not only the selected one.
///
/// Each broken sprint is reported on stderr before the command fails.
pub fn validate_config(config: Option<&Path>, formatting: FormattingConfig) -> Result<()> {
    let burnup_config = load_unvalidated_config(config)?;
    let formatter = formatting.formatter();

    if !burnup_config.has_sprints() {
        anyhow::bail!("No sprints defined");
    }

    let problems = sprint_problems(&burnup_config);
    if problems.is_empty() {
        println!("{}", formatter.success("Well done, no error detected!"));
        return Ok(());
    }

    for problem in &problems {
        eprintln!("{}", formatter.error(problem));
    }
    anyhow::bail!(
        "{} of {} sprint definitions are invalid",
        problems.len(),
        burnup_config.sprints.len()
    )
}

pub(crate) fn sprint_problems(config: &BurnupConfig) -> Vec<String> {
    config
        .sprint_errors()
        .into_iter()
        .map(|(name, error)| format!("Error in sprint [{}] definition: {}", name, error))
        .collect()
}
