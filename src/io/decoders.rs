//! Suffix-selected text decoders.
//!
//! A [`TextDecoder`] turns one path into a buffered text reader. Dropping the
//! reader closes the underlying file. The [`DecoderRegistry`] maps file-name
//! suffixes to decoders with a fallback for everything else:
//!
//! | suffix | decoder |
//! |--------|---------|
//! | `gz`   | [`GzipDecoder`] |
//! | `bz2`  | [`Bzip2Decoder`] |
//! | other  | [`PlainTextDecoder`] |

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

/// A readable text stream; dropping it releases the underlying resource.
pub type TextReader = Box<dyn BufRead + Send>;

/// Opens a path as a stream of decoded text.
pub trait TextDecoder: Send + Sync {
    /// Short name used in logs and in [`crate::pipeline::OpenSource`].
    fn name(&self) -> &str;

    /// Open `path`. On error nothing stays open.
    fn open(&self, path: &Path) -> io::Result<TextReader>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextDecoder;

impl TextDecoder for PlainTextDecoder {
    fn name(&self) -> &str {
        "plain"
    }

    fn open(&self, path: &Path) -> io::Result<TextReader> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// Gzip decoder; concatenated members are read as one stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct GzipDecoder;

impl TextDecoder for GzipDecoder {
    fn name(&self) -> &str {
        "gzip"
    }

    fn open(&self, path: &Path) -> io::Result<TextReader> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    }
}

/// Bzip2 decoder; concatenated streams are read as one stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bzip2Decoder;

impl TextDecoder for Bzip2Decoder {
    fn name(&self) -> &str {
        "bzip2"
    }

    fn open(&self, path: &Path) -> io::Result<TextReader> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(MultiBzDecoder::new(file))))
    }
}

/// Lookup table from file-name suffix to decoder.
#[derive(Clone)]
pub struct DecoderRegistry {
    by_suffix: HashMap<String, Arc<dyn TextDecoder>>,
    fallback: Arc<dyn TextDecoder>,
}

impl DecoderRegistry {
    /// Registry with no suffix entries; every path goes to `fallback`.
    pub fn with_fallback(fallback: Arc<dyn TextDecoder>) -> Self {
        Self {
            by_suffix: HashMap::new(),
            fallback,
        }
    }

    /// Register (or replace) the decoder for `suffix`.
    ///
    /// The suffix may be given with or without its leading dot and may span
    /// several extensions (`tar.gz`).
    pub fn register(&mut self, suffix: &str, decoder: Arc<dyn TextDecoder>) -> &mut Self {
        let key = suffix.trim_start_matches('.').to_string();
        self.by_suffix.insert(key, decoder);
        self
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with_decoder(mut self, suffix: &str, decoder: Arc<dyn TextDecoder>) -> Self {
        self.register(suffix, decoder);
        self
    }

    /// Select the decoder for `path`.
    ///
    /// Candidate suffixes are tried longest first: `app.log.gz` checks
    /// `log.gz` before `gz`. Matching is case-sensitive.
    pub fn decoder_for(&self, path: &Path) -> &Arc<dyn TextDecoder> {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return &self.fallback;
        };

        name.match_indices('.')
            .map(|(idx, _)| &name[idx + 1..])
            .filter(|suffix| !suffix.is_empty())
            .find_map(|suffix| self.by_suffix.get(suffix))
            .unwrap_or(&self.fallback)
    }

    /// Registered suffixes, sorted.
    pub fn suffixes(&self) -> Vec<&str> {
        let mut suffixes: Vec<&str> = self.by_suffix.keys().map(String::as_str).collect();
        suffixes.sort_unstable();
        suffixes
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::with_fallback(Arc::new(PlainTextDecoder))
            .with_decoder("gz", Arc::new(GzipDecoder))
            .with_decoder("bz2", Arc::new(Bzip2Decoder))
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<(&str, &str)> = self
            .suffixes()
            .into_iter()
            .map(|suffix| (suffix, self.by_suffix[suffix].name()))
            .collect();
        f.debug_struct("DecoderRegistry")
            .field("by_suffix", &entries)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}
