//! CLI command implementations for burnup operations.
//!
//! - **sprint**: Compute and write the burnup report for one sprint
//! - **result-per-story**: Compare hours booked per story with the plan
//! - **ls**: List the configured sprints
//! - **validate**: Check every sprint definition
//! - **init**: Write a template `.burnup.toml`
//! - **dump-config**: Print a sprint's resolved configuration

pub mod dump_config;
pub mod init;
pub mod list;
pub mod result_per_story;
pub mod sprint;
pub mod validate;

pub use dump_config::dump_config;
pub use init::init_config;
pub use list::list_sprints;
pub use result_per_story::{run_result_per_story, StoryCommandConfig};
pub use sprint::{run_sprint, SprintCommandConfig};
pub use validate::validate_config;
