// Export modules for library usage
pub mod achievement;
pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod cumulate;
pub mod formatting;
pub mod grouping;
pub mod io;
pub mod normalize;
pub mod per_story;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use crate::achievement::{achieved, commitment, Achievement, AchievementIndex};
pub use crate::calendar::CalendarRange;
pub use crate::config::{load_config, BurnupConfig, SprintConfig};
pub use crate::core::{
    Error, FactKind, IssueEvent, Metric, Result, StoryMetric, TimeEntry, HOURS_PER_MAN_DAY,
};
pub use crate::cumulate::{cumulate, BurnupSeries, MetricSeries};
pub use crate::grouping::{DailyHours, DailyTimeTotal, ForcedOverride};
pub use crate::normalize::{effective_target, normalize, NormalizedSeries};
pub use crate::per_story::{
    result_per_story, StoryMatcher, StoryReport, StoryResult, OTHER_STORY,
};
pub use crate::pipeline::{run_burnup, BurnupInputs, Targets};
pub use crate::report::{BurnupReport, DayBreakdown, MetricSummary};
