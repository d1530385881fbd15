//! Runtime setup for the CLI: tracing subscriber, color policy and
//! the reference date used by the clamp-to-today rule.

use chrono::{Local, NaiveDate};
use tracing_subscriber::EnvFilter;

use crate::formatting::FormattingConfig;

const DEFAULT_FILTER: &str = "warn";

/// Filter used when `RUST_LOG` is unset.
///
/// `-v` only adds the per-day breakdown to the report, so logging stays at
/// `warn`. `-vv` raises it to `info` and `-vvv` to `debug`.
fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 | 1 => DEFAULT_FILTER,
        2 => "burnup=info",
        _ => "burnup=debug",
    }
}

/// Install the global tracing subscriber once at startup.
///
/// Output goes to stderr so reports on stdout stay clean.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    // A second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn formatting_config(plain: bool) -> FormattingConfig {
    if plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    }
}

pub fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}
