//! Source opening stage.
//!
//! [`SourceOpener`] turns a sequence of paths into a sequence of
//! [`OpenSource`] handles, each of which is itself a sequence of lines.
//!
//! # Resource lifecycle
//!
//! The reader behind an `OpenSource` lives in a slot shared between the
//! handle and the opener. Whoever empties the slot first releases the file:
//!
//! - the handle, when it reads end-of-file or hits a read error
//! - the handle, on [`Sequence::close`] or drop
//! - the opener, right before it pulls the next path or when it is closed
//!
//! Taking the reader out of the slot happens once, so release happens once,
//! and the opener never has more than one file open at a time.

use super::policy::ErrorPolicy;
use super::stage::Sequence;
use super::stats::PipelineCounters;
use crate::errors::{PipelineError, Result};
use crate::io::decoders::{DecoderRegistry, TextReader};
use parking_lot::Mutex;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// A line of decoded text with its terminator stripped.
pub type Line = String;

type ReaderSlot = Arc<Mutex<Option<TextReader>>>;

fn release_slot(slot: &Mutex<Option<TextReader>>, path: &Path, reason: &str) -> bool {
    let reader = slot.lock().take();
    match reader {
        Some(reader) => {
            drop(reader);
            debug!(path = %path.display(), reason, "released source");
            true
        }
        None => false,
    }
}

/// One open, line-producing handle over a single file.
pub struct OpenSource {
    path: PathBuf,
    decoder: String,
    slot: ReaderSlot,
    buffer: String,
    line_number: usize,
    finished: bool,
    counters: Arc<PipelineCounters>,
}

impl OpenSource {
    fn new(path: PathBuf, decoder: &str, reader: TextReader, counters: Arc<PipelineCounters>) -> Self {
        Self {
            path,
            decoder: decoder.to_string(),
            slot: Arc::new(Mutex::new(Some(reader))),
            buffer: String::new(),
            line_number: 0,
            finished: false,
            counters,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the decoder the source was opened with.
    pub fn decoder(&self) -> &str {
        &self.decoder
    }

    /// Number of lines produced so far (the 1-based number of the last line).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Whether the underlying resource is still held.
    pub fn is_open(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Attach path and line number to every line.
    pub fn located(self) -> LocatedSource {
        LocatedSource {
            path: Arc::from(self.path.as_path()),
            source: self,
        }
    }

    fn release_handle(&self) -> ReleaseHandle {
        ReleaseHandle {
            path: self.path.clone(),
            slot: Arc::downgrade(&self.slot),
        }
    }

    fn finish(&mut self, reason: &str) {
        self.finished = true;
        release_slot(&self.slot, &self.path, reason);
    }

    fn read_line(&mut self) -> io::Result<Option<usize>> {
        let mut guard = self.slot.lock();
        match guard.as_mut() {
            Some(reader) => {
                self.buffer.clear();
                reader.read_line(&mut self.buffer).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn strip_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

impl Sequence for OpenSource {
    type Item = Line;

    fn next_item(&mut self) -> Result<Option<Line>> {
        if self.finished {
            return Ok(None);
        }

        match self.read_line() {
            Ok(Some(0)) => {
                self.finish("exhausted");
                Ok(None)
            }
            Ok(Some(_)) => {
                self.line_number += 1;
                self.counters.record_line_read();
                let mut line = std::mem::take(&mut self.buffer);
                strip_terminator(&mut line);
                Ok(Some(line))
            }
            Ok(None) => {
                self.finished = true;
                Err(PipelineError::SourceReleased {
                    path: self.path.clone(),
                })
            }
            Err(source) => {
                self.finish("read error");
                Err(PipelineError::read(self.path.clone(), source))
            }
        }
    }

    fn close(&mut self) {
        if !self.finished {
            self.finish("closed");
        }
    }

    fn name(&self) -> &str {
        "source"
    }
}

impl Drop for OpenSource {
    fn drop(&mut self) {
        release_slot(&self.slot, &self.path, "dropped");
    }
}

/// Weak reference the opener keeps to the source it emitted last.
struct ReleaseHandle {
    path: PathBuf,
    slot: Weak<Mutex<Option<TextReader>>>,
}

impl ReleaseHandle {
    fn release(self) -> bool {
        match self.slot.upgrade() {
            Some(slot) => release_slot(&slot, &self.path, "opener advanced"),
            None => false,
        }
    }
}

/// Maps paths to open sources, choosing a decoder by file-name suffix.
///
/// Each path is opened at the moment it is pulled, never earlier, and the
/// previously emitted source is released before the next path is pulled.
pub struct SourceOpener<S> {
    paths: S,
    registry: Arc<DecoderRegistry>,
    policy: ErrorPolicy,
    previous: Option<ReleaseHandle>,
    counters: Arc<PipelineCounters>,
}

impl<S: Sequence<Item = PathBuf>> SourceOpener<S> {
    pub fn new(paths: S, registry: Arc<DecoderRegistry>) -> Self {
        Self {
            paths,
            registry,
            policy: ErrorPolicy::Abort,
            previous: None,
            counters: Arc::default(),
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_counters(mut self, counters: Arc<PipelineCounters>) -> Self {
        self.counters = counters;
        self
    }

    fn release_previous(&mut self) {
        if let Some(handle) = self.previous.take() {
            handle.release();
        }
    }
}

impl<S: Sequence<Item = PathBuf>> Sequence for SourceOpener<S> {
    type Item = OpenSource;

    fn next_item(&mut self) -> Result<Option<OpenSource>> {
        self.release_previous();

        while let Some(path) = self.paths.next_item()? {
            let decoder = self.registry.decoder_for(&path);
            match decoder.open(&path) {
                Ok(reader) => {
                    debug!(path = %path.display(), decoder = decoder.name(), "opened source");
                    self.counters.record_file_opened();
                    let source =
                        OpenSource::new(path, decoder.name(), reader, Arc::clone(&self.counters));
                    self.previous = Some(source.release_handle());
                    return Ok(Some(source));
                }
                Err(source) => match self.policy {
                    ErrorPolicy::Abort => return Err(PipelineError::open(path, source)),
                    ErrorPolicy::Skip => {
                        warn!(path = %path.display(), error = %source, "skipping unopenable file");
                        self.counters.record_file_skipped();
                    }
                },
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.release_previous();
        self.paths.close();
    }

    fn name(&self) -> &str {
        "open"
    }
}

/// Open every path from `paths` with the decoder its suffix selects.
pub fn open<S>(paths: S, registry: Arc<DecoderRegistry>) -> SourceOpener<S>
where
    S: Sequence<Item = PathBuf>,
{
    SourceOpener::new(paths, registry)
}

/// A line together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLine {
    pub path: Arc<Path>,
    /// 1-based line number within the file
    pub line_number: usize,
    pub text: Line,
}

/// [`OpenSource`] adapter yielding [`LocatedLine`]s.
pub struct LocatedSource {
    path: Arc<Path>,
    source: OpenSource,
}

impl Sequence for LocatedSource {
    type Item = LocatedLine;

    fn next_item(&mut self) -> Result<Option<LocatedLine>> {
        Ok(self.source.next_item()?.map(|text| LocatedLine {
            path: Arc::clone(&self.path),
            line_number: self.source.line_number(),
            text,
        }))
    }

    fn close(&mut self) {
        self.source.close();
    }

    fn name(&self) -> &str {
        self.source.name()
    }
}
