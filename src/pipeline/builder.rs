//! Composition root: builds the find → open → concat → filter chain and
//! drives it.
//!
//! ```rust,ignore
//! let mut pipeline = PipelineBuilder::new("www")
//!     .glob("access-log*")
//!     .pattern("(?i)python")
//!     .build()?;
//!
//! for line in &mut pipeline {
//!     println!("{}", line?);
//! }
//! ```

use super::filter::{MatchOptions, Matcher};
use super::opener::{LocatedLine, Line, OpenSource, SourceOpener};
use super::policy::ErrorPolicy;
use super::stage::{BoxSequence, Sequence, SequenceExt};
use super::stats::{PipelineCounters, PipelineStats};
use crate::errors::Result;
use crate::io::decoders::DecoderRegistry;
use crate::io::walker::PathFinder;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle of a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// Built, nothing pulled yet
    Idle,
    /// At least one item requested, not yet finished
    Running,
    /// Upstream reported end of sequence
    Exhausted,
    /// A stage failed; holds the error message
    Aborted(String),
    /// The consumer stopped early
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Exhausted | Self::Aborted(_) | Self::Cancelled)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Aborted(reason) => write!(f, "aborted: {reason}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    root: PathBuf,
    glob: String,
    pattern: String,
    match_options: MatchOptions,
    traversal_policy: ErrorPolicy,
    open_policy: ErrorPolicy,
    max_count: Option<usize>,
    registry: DecoderRegistry,
}

impl PipelineBuilder {
    /// Start a pipeline rooted at `root`. Defaults: glob `*`, pattern that
    /// matches every line, abort on every error, standard decoders.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            glob: "*".to_string(),
            pattern: String::new(),
            match_options: MatchOptions::default(),
            traversal_policy: ErrorPolicy::Abort,
            open_policy: ErrorPolicy::Abort,
            max_count: None,
            registry: DecoderRegistry::default(),
        }
    }

    /// File-name glob selecting which files are read.
    pub fn glob(mut self, glob: impl Into<String>) -> Self {
        self.glob = glob.into();
        self
    }

    /// Regular expression lines must match.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.match_options.case_insensitive = yes;
        self
    }

    pub fn invert(mut self, yes: bool) -> Self {
        self.match_options.invert = yes;
        self
    }

    /// Stop after this many matching lines.
    pub fn max_count(mut self, count: Option<usize>) -> Self {
        self.max_count = count;
        self
    }

    pub fn traversal_policy(mut self, policy: ErrorPolicy) -> Self {
        self.traversal_policy = policy;
        self
    }

    pub fn open_policy(mut self, policy: ErrorPolicy) -> Self {
        self.open_policy = policy;
        self
    }

    /// Replace the suffix → decoder table.
    pub fn decoders(mut self, registry: DecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Add the optional stage when `condition` holds.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    /// Validate everything eagerly and assemble the stage chain.
    ///
    /// The match pattern is compiled first, so a malformed pattern is
    /// reported even if the root is missing. Nothing is opened here.
    pub fn build(self) -> Result<Pipeline> {
        let matcher = Matcher::compile(&self.pattern, self.match_options)?;
        let counters = Arc::new(PipelineCounters::default());

        let paths = PathFinder::new(&self.root, &self.glob)?
            .with_policy(self.traversal_policy)
            .with_counters(Arc::clone(&counters));

        let lines = SourceOpener::new(paths, Arc::new(self.registry))
            .with_policy(self.open_policy)
            .with_counters(Arc::clone(&counters))
            .map_items(OpenSource::located)
            .concat()
            .filter_by(matcher);

        let stages = match self.max_count {
            Some(count) => lines.limit(count).boxed(),
            None => lines.boxed(),
        };

        debug!(
            root = %self.root.display(),
            glob = %self.glob,
            pattern = %self.pattern,
            "pipeline built"
        );

        Ok(Pipeline {
            stages,
            state: PipelineState::Idle,
            counters,
        })
    }
}

/// A ready-to-pull sequence of matching lines with an explicit lifecycle.
///
/// Reaching any terminal state closes every stage exactly once; dropping a
/// pipeline that has not reached one cancels it.
pub struct Pipeline {
    stages: BoxSequence<LocatedLine>,
    state: PipelineState,
    counters: Arc<PipelineCounters>,
}

impl Pipeline {
    /// Pull the next matching line along with its origin.
    pub fn next_located(&mut self) -> Result<Option<LocatedLine>> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        self.state = PipelineState::Running;

        match self.stages.next_item() {
            Ok(Some(line)) => {
                self.counters.record_line_matched();
                Ok(Some(line))
            }
            Ok(None) => {
                self.finish(PipelineState::Exhausted);
                Ok(None)
            }
            Err(err) => {
                self.finish(PipelineState::Aborted(err.to_string()));
                Err(err)
            }
        }
    }

    /// Stop early, releasing whatever source is currently open.
    ///
    /// No-op once the pipeline has reached a terminal state.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.finish(PipelineState::Cancelled);
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn stats(&self) -> PipelineStats {
        self.counters.snapshot()
    }

    /// Iterate over located lines instead of bare text.
    pub fn located(&mut self) -> LocatedLines<'_> {
        LocatedLines { pipeline: self }
    }

    fn finish(&mut self, state: PipelineState) {
        self.stages.close();
        let stats = self.counters.snapshot();
        info!(
            state = %state,
            files_opened = stats.files_opened,
            files_skipped = stats.files_skipped,
            paths_skipped = stats.paths_skipped,
            lines_read = stats.lines_read,
            lines_matched = stats.lines_matched,
            "pipeline finished"
        );
        self.state = state;
    }
}

impl Sequence for Pipeline {
    type Item = Line;

    fn next_item(&mut self) -> Result<Option<Line>> {
        Ok(self.next_located()?.map(|located| located.text))
    }

    fn close(&mut self) {
        self.cancel();
    }

    fn name(&self) -> &str {
        "pipeline"
    }
}

impl Iterator for Pipeline {
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}

impl std::iter::FusedIterator for Pipeline {}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Iterator returned by [`Pipeline::located`].
pub struct LocatedLines<'a> {
    pipeline: &'a mut Pipeline,
}

impl Iterator for LocatedLines<'_> {
    type Item = Result<LocatedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pipeline.next_located().transpose()
    }
}
