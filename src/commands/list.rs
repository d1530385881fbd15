use anyhow::Result;
use std::path::Path;

use crate::config::{load_unvalidated_config, BurnupConfig};

/// Print every sprint name in the configuration, marking `current`.
///
/// Broken sprint definitions are still listed; `validate` reports them.
pub fn list_sprints(config: Option<&Path>) -> Result<()> {
    let burnup_config = load_unvalidated_config(config)?;
    print!("{}", sprint_listing(&burnup_config));
    Ok(())
}

pub(crate) fn sprint_listing(config: &BurnupConfig) -> String {
    if !config.has_sprints() {
        return "No sprints defined\n".to_string();
    }

    let mut listing = String::from("All currently defined sprints:\n");
    for name in config.sprints.keys() {
        let marker = if config.current.as_deref() == Some(name.as_str()) {
            " (current)"
        } else {
            ""
        };
        listing.push_str(&format!("  {}{}\n", name, marker));
    }
    listing
}
