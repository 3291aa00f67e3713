use serde::{Deserialize, Serialize};

use crate::pipeline::ErrorPolicy;

/// Root configuration structure, read from `.logsift.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogsiftConfig {
    /// Search defaults
    #[serde(default)]
    pub search: Option<SearchConfig>,

    /// Error policies
    #[serde(default)]
    pub errors: Option<ErrorsConfig>,
}

/// Defaults for the `search` command; every field can be overridden on the
/// command line.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// File-name glob
    #[serde(default)]
    pub glob: Option<String>,

    #[serde(default)]
    pub case_insensitive: Option<bool>,

    #[serde(default)]
    pub invert: Option<bool>,

    /// Stop after this many matches
    #[serde(default)]
    pub max_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ErrorsConfig {
    /// Policy for unreadable directories
    #[serde(default)]
    pub traversal: Option<ErrorPolicy>,

    /// Policy for files that cannot be opened
    #[serde(default)]
    pub open: Option<ErrorPolicy>,
}

pub const DEFAULT_GLOB: &str = "*";

impl LogsiftConfig {
    pub fn glob(&self) -> &str {
        self.search
            .as_ref()
            .and_then(|s| s.glob.as_deref())
            .unwrap_or(DEFAULT_GLOB)
    }

    pub fn case_insensitive(&self) -> bool {
        self.search
            .as_ref()
            .and_then(|s| s.case_insensitive)
            .unwrap_or(false)
    }

    pub fn invert(&self) -> bool {
        self.search.as_ref().and_then(|s| s.invert).unwrap_or(false)
    }

    pub fn max_count(&self) -> Option<usize> {
        self.search.as_ref().and_then(|s| s.max_count)
    }

    pub fn traversal_policy(&self) -> ErrorPolicy {
        self.errors
            .as_ref()
            .and_then(|e| e.traversal)
            .unwrap_or_default()
    }

    pub fn open_policy(&self) -> ErrorPolicy {
        self.errors.as_ref().and_then(|e| e.open).unwrap_or_default()
    }
}

/// Contents written by `logsift init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# logsift configuration

[search]
glob = "*"
case_insensitive = false
invert = false
# max_count = 100

[errors]
# "abort" stops at the first failure, "skip" logs it and continues
traversal = "abort"
open = "abort"
"#;
