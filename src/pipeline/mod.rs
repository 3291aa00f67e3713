//! Lazy, pull-based stream processing.
//!
//! Each stage is a small struct implementing [`Sequence`] over its upstream.
//! Pulling one item from the end of the chain does exactly enough work in
//! every stage to produce it; nothing is read ahead.
//!
//! Stages, in the order [`PipelineBuilder`] composes them:
//!
//! 1. [`PathFinder`](crate::io::PathFinder): matching file paths
//! 2. [`SourceOpener`]: one [`OpenSource`] per path
//! 3. [`Concat`]: lines of all sources, in order
//! 4. [`Filter`]: lines accepted by a [`Matcher`]
//! 5. [`Limit`]: optional cap on the number of matches

pub mod builder;
pub mod concat;
pub mod filter;
pub mod limit;
pub mod opener;
pub mod policy;
pub mod stage;
pub mod stats;

pub use builder::{LocatedLines, Pipeline, PipelineBuilder, PipelineState};
pub use concat::Concat;
pub use filter::{Filter, MatchOptions, Matcher, Predicate};
pub use limit::Limit;
pub use opener::{open, Line, LocatedLine, LocatedSource, OpenSource, SourceOpener};
pub use policy::ErrorPolicy;
pub use stage::{
    from_iter, from_results, BoxSequence, Items, IterSequence, Map, ResultSequence, Sequence,
    SequenceExt,
};
pub use stats::{PipelineCounters, PipelineStats};
