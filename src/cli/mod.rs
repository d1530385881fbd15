//! Command-line interface for burnup
//!
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{Cli, Commands, OutputFormat};
pub use setup::{formatting_config, init_tracing, resolve_today};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    use clap::Parser;
    Cli::parse()
}
