use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::BurnupConfig;
use crate::core::{Error, Result, ResultExt};

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".burnup.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

type Parser = fn(&str) -> Result<BurnupConfig>;

/// Parse a TOML string without resolving any sprint.
pub fn parse_config(contents: &str) -> Result<BurnupConfig> {
    toml::from_str::<BurnupConfig>(contents)
        .map_err(|e| Error::configuration(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e)))
}

/// Parse a TOML string and check that every sprint resolves.
pub fn parse_and_validate_config(contents: &str) -> Result<BurnupConfig> {
    let config = parse_config(contents)?;

    if let Some((name, err)) = config.sprint_errors().into_iter().next() {
        return Err(err.with_context(format!("Sprint {}", name)));
    }

    if let Some(current) = &config.current {
        if !config.sprints.contains_key(current) {
            log::warn!("Current sprint '{}' is not defined in configuration", current);
        }
    }

    Ok(config)
}

fn load_from_path_with(config_path: &Path, parse: Parser) -> Result<BurnupConfig> {
    let contents = read_config_file(config_path)
        .context(format!("Failed to read {}", config_path.display()))?;
    let config = parse(&contents)?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_config_from_path(config_path: &Path) -> Result<BurnupConfig> {
    load_from_path_with(config_path, parse_and_validate_config)
}

/// Pure function to try loading config from a specific path
pub(crate) fn try_load_config_from_path(
    config_path: &Path,
    parse: Parser,
) -> Option<Result<BurnupConfig>> {
    match read_config_file(config_path) {
        Ok(contents) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(parse(&contents))
        }
        Err(e) => {
            handle_read_error(config_path, &e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn discover_with(start: PathBuf, parse: Parser) -> Result<BurnupConfig> {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path, parse))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(BurnupConfig::default())
        })
}

/// Search `start` and its ancestors for the nearest config file.
///
/// A file that exists but does not parse is an error; no file at all yields
/// the empty default configuration.
pub fn discover_config(start: PathBuf) -> Result<BurnupConfig> {
    discover_with(start, parse_and_validate_config)
}

fn load_with(explicit: Option<&Path>, parse: Parser) -> Result<BurnupConfig> {
    match explicit {
        Some(path) => load_from_path_with(path, parse),
        None => discover_with(std::env::current_dir()?, parse),
    }
}

/// Load configuration from `explicit` if given, otherwise by discovery
/// from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<BurnupConfig> {
    load_with(explicit, parse_and_validate_config)
}

/// Like [`load_config`], but sprints are left unresolved so every broken
/// definition can be reported, not just the first.
pub fn load_unvalidated_config(explicit: Option<&Path>) -> Result<BurnupConfig> {
    load_with(explicit, parse_config)
}
