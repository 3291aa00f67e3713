//! Error types for the logsift pipeline.
//!
//! Every stage reports failures through [`PipelineError`]. Errors carry the
//! offending path (or pattern) so that a caller can tell which file aborted
//! the run without inspecting logs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or pulling from a pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The search root does not exist or is not a directory
    #[error("Search root not found: {}", path.display())]
    RootNotFound { path: PathBuf },

    /// The file-name glob could not be compiled
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Directory traversal failed (permission denied, vanished directory, loop)
    #[error("Failed to traverse {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A discovered path could not be opened or its decoder could not start
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Streaming lines from an already-open source failed
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source was released before its handle was read again
    #[error("Source {} was already released", path.display())]
    SourceReleased { path: PathBuf },

    /// The match pattern could not be compiled
    #[error("Invalid match pattern '{pattern}': {source}")]
    Predicate {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration file errors
    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl PipelineError {
    /// Create a traversal error with path context
    pub fn traversal(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Traversal {
            path: path.into(),
            source,
        }
    }

    /// Create an open error with path context
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a read error with path context
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// The file or directory this error is about, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::RootNotFound { path }
            | Self::Traversal { path, .. }
            | Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::SourceReleased { path }
            | Self::Config { path, .. } => Some(path),
            Self::InvalidGlob { .. } | Self::Predicate { .. } => None,
        }
    }

    /// Whether the error was raised while building the pipeline rather than
    /// while pulling items from it.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound { .. }
                | Self::InvalidGlob { .. }
                | Self::Predicate { .. }
                | Self::Config { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, PipelineError>;
