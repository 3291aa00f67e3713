//! CLI command implementations.
//!
//! - **search**: run the find → open → concat → filter pipeline and print matches
//! - **init**: write a default `.logsift.toml`

pub mod init;
pub mod search;

pub use init::init_config;
pub use search::{resolve_options, run_search, SearchArgs, SearchOptions, SearchOutcome};
