use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::core::LogsiftConfig;
use crate::errors::{PipelineError, Result};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".logsift.toml";

/// Directories checked for a config file, starting with the current one
const MAX_SEARCH_DEPTH: usize = 10;

/// Parse config from a TOML string
pub fn parse_config(contents: &str) -> std::result::Result<LogsiftConfig, toml::de::Error> {
    toml::from_str(contents)
}

/// Load one config file. Unreadable or malformed files are `Config` errors.
pub fn load_config_from(path: &Path) -> Result<LogsiftConfig> {
    let config_error = |message: String| PipelineError::Config {
        path: path.to_path_buf(),
        message,
    };

    let contents = fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
    let config = parse_config(&contents).map_err(|e| config_error(e.message().to_string()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Locations checked for `.logsift.toml`, nearest first.
pub fn config_candidates(start: &Path) -> impl Iterator<Item = PathBuf> + '_ {
    start
        .ancestors()
        .take(MAX_SEARCH_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Load the nearest config file at or above `start`, if there is one.
///
/// Only the nearest file is considered; a broken one is not skipped in favor
/// of a config further up.
pub fn discover_config(start: &Path) -> Option<Result<LogsiftConfig>> {
    config_candidates(start)
        .find(|candidate| candidate.is_file())
        .map(|candidate| load_config_from(&candidate))
}

/// Resolve the config for a search started in `dir`.
///
/// An `explicit` path must load. A discovered file that fails to load is
/// reported and replaced by the defaults.
pub fn load_config_in(dir: &Path, explicit: Option<&Path>) -> Result<LogsiftConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    match discover_config(dir) {
        Some(Ok(config)) => Ok(config),
        Some(Err(err)) => {
            warn!(error = %err, "ignoring config file, using defaults");
            Ok(LogsiftConfig::default())
        }
        None => {
            debug!(start = %dir.display(), "no config file found, using defaults");
            Ok(LogsiftConfig::default())
        }
    }
}

/// [`load_config_in`] for the current working directory.
pub fn load_config(explicit: Option<&Path>) -> Result<LogsiftConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    match env::current_dir() {
        Ok(dir) => load_config_in(&dir, None),
        Err(e) => {
            warn!(error = %e, "current directory unavailable, using default config");
            Ok(LogsiftConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::core::DEFAULT_CONFIG_TOML;
    use crate::pipeline::ErrorPolicy;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(indoc! {r#"
            [search]
            glob = "*.log*"
            case_insensitive = true
            max_count = 5

            [errors]
            open = "skip"
        "#})
        .unwrap();

        assert_eq!(config.glob(), "*.log*");
        assert!(config.case_insensitive());
        assert!(!config.invert());
        assert_eq!(config.max_count(), Some(5));
        assert_eq!(config.open_policy(), ErrorPolicy::Skip);
        assert_eq!(config.traversal_policy(), ErrorPolicy::Abort);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, LogsiftConfig::default());
        assert_eq!(config.glob(), "*");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = parse_config("[search]\ncolour = true\n").unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_default_config_template_parses() {
        let config = parse_config(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.glob(), "*");
        assert_eq!(config.max_count(), None);
    }

    #[test]
    fn test_candidates_stop_at_search_depth() {
        let deep: PathBuf = (0..15).map(|i| format!("d{i}")).collect();
        let start = Path::new("/").join(deep);
        let candidates: Vec<PathBuf> = config_candidates(&start).collect();

        assert_eq!(candidates.len(), MAX_SEARCH_DEPTH);
        assert_eq!(candidates[0], start.join(CONFIG_FILE_NAME));
        assert_eq!(candidates[1], start.parent().unwrap().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[search]\nglob = \"*.gz\"\n",
        )
        .unwrap();
        let nested = dir.path().join("x/y");
        fs::create_dir_all(&nested).unwrap();

        let config = discover_config(&nested).unwrap().unwrap();
        assert_eq!(config.glob(), "*.gz");
    }

    #[test]
    fn test_broken_discovered_config_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[search\n").unwrap();

        let err = discover_config(dir.path()).unwrap().unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));
        assert_eq!(err.path(), Some(dir.path().join(CONFIG_FILE_NAME).as_path()));
    }

    #[test]
    fn test_broken_discovered_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[search\n").unwrap();

        let config = load_config_in(dir.path(), None).unwrap();
        assert_eq!(config, LogsiftConfig::default());
    }

    #[test]
    fn test_explicit_config_wins_over_discovered() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[search]\nglob = \"*.a\"\n").unwrap();
        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "[search]\nglob = \"*.b\"\n").unwrap();

        let config = load_config_in(dir.path(), Some(&explicit)).unwrap();
        assert_eq!(config.glob(), "*.b");
    }

    #[test]
    fn test_explicit_config_errors_surface() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config_in(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, PipelineError::Config { .. }));

        let broken = dir.path().join("broken.toml");
        fs::write(&broken, "max_count = \"many\"").unwrap();
        let err = load_config_from(&broken).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
