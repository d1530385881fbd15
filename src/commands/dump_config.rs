use anyhow::Result;
use std::path::Path;

use crate::config::load_config;

/// Print the sprint the `sprint` command would use, after date parsing and
/// override resolution.
pub fn dump_config(name: Option<&str>, config: Option<&Path>) -> Result<()> {
    let burnup_config = load_config(config)?;
    let sprint = burnup_config.sprint(name)?;
    println!("{}", serde_json::to_string_pretty(&sprint)?);
    Ok(())
}
