//! Counters shared by the stages of one pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Live counters updated by the stages as items flow through.
#[derive(Debug, Default)]
pub struct PipelineCounters {
    paths_skipped: AtomicUsize,
    files_opened: AtomicUsize,
    files_skipped: AtomicUsize,
    lines_read: AtomicUsize,
    lines_matched: AtomicUsize,
}

impl PipelineCounters {
    pub fn record_path_skipped(&self) {
        self.paths_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_opened(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_line_matched(&self) {
        self.lines_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            paths_skipped: self.paths_skipped.load(Ordering::Relaxed),
            files_opened: self.files_opened.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            lines_matched: self.lines_matched.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PipelineCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Directory entries skipped because traversal failed on them
    pub paths_skipped: usize,
    pub files_opened: usize,
    /// Discovered files that could not be opened and were skipped
    pub files_skipped: usize,
    pub lines_read: usize,
    pub lines_matched: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_updates() {
        let counters = PipelineCounters::default();
        counters.record_file_opened();
        counters.record_line_read();
        counters.record_line_read();
        counters.record_line_matched();

        let stats = counters.snapshot();
        assert_eq!(stats.files_opened, 1);
        assert_eq!(stats.lines_read, 2);
        assert_eq!(stats.lines_matched, 1);
        assert_eq!(stats.files_skipped, 0);
    }
}
