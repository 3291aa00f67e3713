//! Lazy, composable line search over plain and compressed files.
//!
//! The crate is built around the pull-based [`Sequence`] trait. Stages own
//! their upstream, produce one item per pull and release file handles as soon
//! as they are no longer needed, so at most one file is open at any time.
//!
//! ```rust,no_run
//! use logsift::PipelineBuilder;
//!
//! # fn main() -> logsift::errors::Result<()> {
//! let pipeline = PipelineBuilder::new("www")
//!     .glob("access-log*")
//!     .pattern("python")
//!     .case_insensitive(true)
//!     .build()?;
//!
//! for line in pipeline {
//!     println!("{}", line?);
//! }
//! # Ok(())
//! # }
//! ```

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod io;
pub mod observability;
pub mod pipeline;

// Re-export commonly used types
pub use crate::errors::{PipelineError, Result};

pub use crate::io::{
    find, Bzip2Decoder, DecoderRegistry, GzipDecoder, PathFinder, PlainTextDecoder, TextDecoder,
};

pub use crate::pipeline::{
    from_iter, open, Concat, ErrorPolicy, Filter, Limit, Line, LocatedLine, MatchOptions,
    Matcher, OpenSource, Pipeline, PipelineBuilder, PipelineState, PipelineStats, Sequence,
    SequenceExt, SourceOpener,
};
