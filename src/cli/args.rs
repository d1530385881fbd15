use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "burnup")]
#[command(about = "Sprint burnup aggregation from time entries and issue closures", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the burnup chart data for a sprint
    Sprint {
        /// Sprint name (defaults to `current`, or the only defined sprint)
        name: Option<String>,

        /// Configuration file (searched upward from the current directory if omitted)
        #[arg(short, long, env = "BURNUP_CONFIG")]
        config: Option<PathBuf>,

        /// JSON array of time entries
        #[arg(long)]
        entries: Option<PathBuf>,

        /// JSON array of issue events
        #[arg(long)]
        issues: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Date used for clamping the calendar (defaults to the local date)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        /// -v: Show hours per user and forced data for each day
        /// -vv: Also log pipeline stages to stderr
        /// -vvv: Log debug details to stderr
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,

        /// Disable colored output
        #[arg(long = "plain")]
        plain: bool,
    },

    /// Compare hours booked on each story with its planned effort
    ResultPerStory {
        /// Sprint name (defaults to `current`, or the only defined sprint)
        name: Option<String>,

        /// Configuration file
        #[arg(short, long, env = "BURNUP_CONFIG")]
        config: Option<PathBuf>,

        /// JSON array of time entries
        #[arg(long)]
        entries: Option<PathBuf>,

        /// JSON array of issue events
        #[arg(long)]
        issues: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long = "plain")]
        plain: bool,
    },

    /// List the sprints defined in the configuration
    #[command(name = "ls")]
    Ls {
        /// Configuration file
        #[arg(short, long, env = "BURNUP_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Check every sprint definition in the configuration
    Validate {
        /// Configuration file
        #[arg(short, long, env = "BURNUP_CONFIG")]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long = "plain")]
        plain: bool,
    },

    /// Initialize a burnup configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print the resolved configuration of a sprint as JSON
    DumpConfig {
        /// Sprint name (defaults to `current`, or the only defined sprint)
        name: Option<String>,

        /// Configuration file
        #[arg(short, long, env = "BURNUP_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}
