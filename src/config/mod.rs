//! `.logsift.toml` configuration.
//!
//! Precedence, highest first: command-line flags, the config file, built-in
//! defaults.

mod core;
mod loader;

pub use self::core::{
    ErrorsConfig, LogsiftConfig, SearchConfig, DEFAULT_CONFIG_TOML, DEFAULT_GLOB,
};
pub use loader::{
    config_candidates, discover_config, load_config, load_config_from, load_config_in,
    parse_config, CONFIG_FILE_NAME,
};
