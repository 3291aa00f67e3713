use crate::errors::{PipelineError, Result};
use crate::pipeline::{ErrorPolicy, PipelineCounters, Sequence};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Lazily walks a directory tree and yields files whose name matches a glob.
///
/// Entries are visited depth-first with each directory's children sorted by
/// file name, so a given snapshot always produces the same order. Directories
/// are descended into but never yielded. Symlinked directories are not
/// followed; a symlink whose name matches is yielded unless it points at a
/// directory, so a dangling link reaches the opener and fails there.
pub struct PathFinder {
    root: PathBuf,
    pattern: glob::Pattern,
    policy: ErrorPolicy,
    walker: Option<walkdir::IntoIter>,
    counters: Arc<PipelineCounters>,
}

impl PathFinder {
    /// Fails with `RootNotFound` if `root` is not an existing directory and
    /// with `InvalidGlob` if `glob` does not compile.
    pub fn new(root: impl Into<PathBuf>, glob: &str) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PipelineError::RootNotFound { path: root });
        }

        let pattern = glob::Pattern::new(glob).map_err(|source| PipelineError::InvalidGlob {
            pattern: glob.to_string(),
            source,
        })?;

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Ok(Self {
            root,
            pattern,
            policy: ErrorPolicy::Abort,
            walker: Some(walker),
            counters: Arc::default(),
        })
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_counters(mut self, counters: Arc<PipelineCounters>) -> Self {
        self.counters = counters;
        self
    }
}

fn file_name_matches(pattern: &glob::Pattern, path: &Path) -> bool {
    path.file_name()
        .map(|name| pattern.matches(&name.to_string_lossy()))
        .unwrap_or(false)
}

/// Regular files, plus symlinks that do not resolve to a directory.
fn is_candidate(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    if !entry.path_is_symlink() {
        return false;
    }
    match fs::metadata(entry.path()) {
        Ok(target) => !target.is_dir(),
        Err(err) => {
            debug!(path = %entry.path().display(), error = %err, "dangling symlink");
            true
        }
    }
}

impl Sequence for PathFinder {
    type Item = PathBuf;

    fn next_item(&mut self) -> Result<Option<PathBuf>> {
        loop {
            let entry = match self.walker.as_mut().map(Iterator::next) {
                Some(Some(entry)) => entry,
                Some(None) => {
                    self.walker = None;
                    return Ok(None);
                }
                None => return Ok(None),
            };

            match entry {
                Ok(entry) => {
                    if file_name_matches(&self.pattern, entry.path()) && is_candidate(&entry) {
                        debug!(path = %entry.path().display(), "discovered");
                        return Ok(Some(entry.into_path()));
                    }
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    let source = io::Error::from(err);
                    match self.policy {
                        ErrorPolicy::Abort => {
                            self.walker = None;
                            return Err(PipelineError::traversal(path, source));
                        }
                        ErrorPolicy::Skip => {
                            warn!(path = %path.display(), error = %source, "skipping unreadable entry");
                            self.counters.record_path_skipped();
                        }
                    }
                }
            }
        }
    }

    fn close(&mut self) {
        self.walker = None;
    }

    fn name(&self) -> &str {
        "find"
    }
}

/// Discover files under `root` whose file name matches `glob`.
pub fn find(root: impl Into<PathBuf>, glob: &str) -> Result<PathFinder> {
    PathFinder::new(root, glob)
}
