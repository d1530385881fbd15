//! Shared error types for the burnup engine

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

use super::Metric;

/// Kind of dated fact that must fall inside the sprint calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactKind {
    Achievement,
    ForcedOverride,
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Achievement => write!(f, "Achievement"),
            Self::ForcedOverride => write!(f, "Forced override"),
        }
    }
}

/// Main error type for burnup operations
#[derive(Debug, Error)]
pub enum Error {
    /// Sprint start falls after its (possibly clamped) end
    #[error("Invalid calendar range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A fact is keyed to a date the calendar does not cover
    #[error("{kind} dated {date} falls outside the sprint calendar ({start} to {end})")]
    MissingCalendarDate {
        kind: FactKind,
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// A daily amount would make a cumulative series decrease
    #[error("Negative {metric} amount {amount} on {date}")]
    NegativeAmount {
        metric: Metric,
        date: NaiveDate,
        amount: f64,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
