use crate::config::LogsiftConfig;
use crate::pipeline::{ErrorPolicy, PipelineBuilder, PipelineState, PipelineStats};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;

/// Raw `search` arguments as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub pattern: String,
    pub root: PathBuf,
    pub glob: Option<String>,
    pub ignore_case: bool,
    pub invert_match: bool,
    pub max_count: Option<usize>,
    pub with_path: bool,
    pub skip_unreadable: bool,
    pub skip_traversal_errors: bool,
}

/// Fully resolved search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub pattern: String,
    pub root: PathBuf,
    pub glob: String,
    pub case_insensitive: bool,
    pub invert: bool,
    pub max_count: Option<usize>,
    pub with_path: bool,
    pub traversal_policy: ErrorPolicy,
    pub open_policy: ErrorPolicy,
}

/// Merge command-line arguments over config values.
///
/// Boolean flags can only switch a behavior on; a config value of `true`
/// cannot be turned off from the command line.
pub fn resolve_options(args: SearchArgs, config: &LogsiftConfig) -> SearchOptions {
    SearchOptions {
        glob: args.glob.unwrap_or_else(|| config.glob().to_string()),
        case_insensitive: args.ignore_case || config.case_insensitive(),
        invert: args.invert_match || config.invert(),
        max_count: args.max_count.or(config.max_count()),
        with_path: args.with_path,
        traversal_policy: config.traversal_policy().or_skip(args.skip_traversal_errors),
        open_policy: config.open_policy().or_skip(args.skip_unreadable),
        pattern: args.pattern,
        root: args.root,
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub stats: PipelineStats,
    pub state: PipelineState,
}

impl SearchOutcome {
    pub fn matched(&self) -> bool {
        self.stats.lines_matched > 0
    }

    /// grep-style exit code: 0 when something matched, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.matched() {
            0
        } else {
            1
        }
    }
}

/// Run the pipeline and write every match to `out`.
///
/// A closed output (broken pipe) cancels the pipeline and is not an error.
pub fn run_search<W: Write>(options: &SearchOptions, out: &mut W) -> Result<SearchOutcome> {
    let mut pipeline = PipelineBuilder::new(&options.root)
        .glob(&options.glob)
        .pattern(&options.pattern)
        .case_insensitive(options.case_insensitive)
        .invert(options.invert)
        .max_count(options.max_count)
        .traversal_policy(options.traversal_policy)
        .open_policy(options.open_policy)
        .build()
        .with_context(|| format!("Failed to start search in {}", options.root.display()))?;

    while let Some(line) = pipeline.next_located()? {
        let written = if options.with_path {
            writeln!(out, "{}:{}:{}", line.path.display(), line.line_number, line.text)
        } else {
            writeln!(out, "{}", line.text)
        };

        match written {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                pipeline.cancel();
                break;
            }
            Err(e) => return Err(e).context("Failed to write output"),
        }
    }

    match out.flush() {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => return Err(e).context("Failed to flush output"),
    }

    Ok(SearchOutcome {
        stats: pipeline.stats(),
        state: pipeline.state().clone(),
    })
}
