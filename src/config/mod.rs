//! Project configuration: sprint definitions loaded from `.burnup.toml`.
//!
//! Raw TOML tables live in [`core`] and are resolved into typed
//! [`SprintConfig`] values by [`sprint`]. The resolved value is what the
//! pipeline receives; nothing downstream reads configuration from ambient
//! state.

mod core;
mod loader;
mod sprint;

pub use self::core::{BurnupConfig, ForcedValue, SprintSection, TargetsSection};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    load_unvalidated_config, parse_and_validate_config, parse_config, CONFIG_FILE_NAME,
};
pub use sprint::SprintConfig;
