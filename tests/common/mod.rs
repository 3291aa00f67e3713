// Shared fixtures and test doubles for logsift integration tests
#![allow(dead_code)]

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use logsift::{DecoderRegistry, TextDecoder};
use logsift::io::TextReader;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{self, BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts every open and close performed through a [`TrackingDecoder`].
#[derive(Debug, Default)]
pub struct ResourceTracker {
    opens: AtomicUsize,
    closes: AtomicUsize,
    open_now: AtomicUsize,
    max_open: AtomicUsize,
    opened_paths: Mutex<Vec<PathBuf>>,
}

impl ResourceTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record_open(&self, path: &Path) {
        self.opens.fetch_add(1, Ordering::SeqCst);
        let now = self.open_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_open.fetch_max(now, Ordering::SeqCst);
        self.opened_paths.lock().push(path.to_path_buf());
    }

    fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.open_now.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn open_now(&self) -> usize {
        self.open_now.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened_paths.lock().clone()
    }
}

/// Reader whose drop is recorded as a close.
struct TrackedReader {
    inner: TextReader,
    tracker: Arc<ResourceTracker>,
}

impl Read for TrackedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for TrackedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.tracker.record_close();
    }
}

/// Wraps another decoder and records its resource lifecycle.
pub struct TrackingDecoder {
    name: String,
    inner: Arc<dyn TextDecoder>,
    tracker: Arc<ResourceTracker>,
}

impl TrackingDecoder {
    pub fn new(name: &str, inner: Arc<dyn TextDecoder>, tracker: Arc<ResourceTracker>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            inner,
            tracker,
        })
    }
}

impl TextDecoder for TrackingDecoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self, path: &Path) -> io::Result<TextReader> {
        let inner = self.inner.open(path)?;
        self.tracker.record_open(path);
        Ok(Box::new(TrackedReader {
            inner,
            tracker: Arc::clone(&self.tracker),
        }))
    }
}

/// In-memory decoder: serves canned lines per file name, fails for names
/// listed in `unopenable`. Never touches the filesystem.
#[derive(Default)]
pub struct StubDecoder {
    contents: Vec<(String, String)>,
    unopenable: Vec<String>,
}

impl StubDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: &str, lines: &[&str]) -> Self {
        let mut text = lines.join("\n");
        text.push('\n');
        self.contents.push((name.to_string(), text));
        self
    }

    pub fn with_unopenable(mut self, name: &str) -> Self {
        self.unopenable.push(name.to_string());
        self
    }
}

impl TextDecoder for StubDecoder {
    fn name(&self) -> &str {
        "stub"
    }

    fn open(&self, path: &Path) -> io::Result<TextReader> {
        let name = path.to_string_lossy();
        if self.unopenable.iter().any(|n| *n == name) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "stub: denied"));
        }
        let text = self
            .contents
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        Ok(Box::new(Cursor::new(text.into_bytes())))
    }
}

/// Registry routing everything through one tracked stub decoder.
pub fn tracked_stub_registry(stub: StubDecoder) -> (DecoderRegistry, Arc<ResourceTracker>) {
    let tracker = ResourceTracker::new();
    let decoder = TrackingDecoder::new("stub", Arc::new(stub), Arc::clone(&tracker));
    (DecoderRegistry::with_fallback(decoder), tracker)
}

/// Standard decoders, each wrapped so opens and closes are counted.
pub fn tracked_default_registry() -> (DecoderRegistry, Arc<ResourceTracker>) {
    let tracker = ResourceTracker::new();
    let registry = DecoderRegistry::with_fallback(TrackingDecoder::new(
        "plain",
        Arc::new(logsift::PlainTextDecoder),
        Arc::clone(&tracker),
    ))
    .with_decoder(
        "gz",
        TrackingDecoder::new("gzip", Arc::new(logsift::GzipDecoder), Arc::clone(&tracker)),
    )
    .with_decoder(
        "bz2",
        TrackingDecoder::new("bzip2", Arc::new(logsift::Bzip2Decoder), Arc::clone(&tracker)),
    );
    (registry, tracker)
}

pub fn write_plain(path: &Path, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

pub fn write_gzip(path: &Path, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut encoder = GzEncoder::new(File::create(path).unwrap(), flate2::Compression::default());
    for line in lines {
        writeln!(encoder, "{}", line).unwrap();
    }
    encoder.finish().unwrap();
}

pub fn write_bzip2(path: &Path, lines: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut encoder = BzEncoder::new(File::create(path).unwrap(), bzip2::Compression::default());
    for line in lines {
        writeln!(encoder, "{}", line).unwrap();
    }
    encoder.finish().unwrap();
}

/// `a.log` + `b.log.gz` from the canonical end-to-end scenario.
pub fn log_fixture() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    write_plain(&dir.path().join("a.log"), &["INFO start", "WARNING disk low"]);
    write_gzip(&dir.path().join("b.log.gz"), &["WARNING cpu high", "INFO done"]);
    dir
}
