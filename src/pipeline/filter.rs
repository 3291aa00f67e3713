//! Line filtering stage and the compiled content matcher.

use super::opener::LocatedLine;
use super::stage::Sequence;
use crate::errors::{PipelineError, Result};
use regex::{Regex, RegexBuilder};

/// Decides whether an item passes a [`Filter`].
///
/// Implementations must not rely on being called more than once per item.
pub trait Predicate<T: ?Sized> {
    fn test(&self, item: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    fn test(&self, item: &T) -> bool {
        self(item)
    }
}

/// Stage that passes through only the items accepted by its predicate.
pub struct Filter<S, P> {
    upstream: S,
    predicate: P,
}

impl<S, P> Filter<S, P>
where
    S: Sequence,
    P: Predicate<S::Item>,
{
    pub fn new(upstream: S, predicate: P) -> Self {
        Self {
            upstream,
            predicate,
        }
    }
}

impl<S, P> Sequence for Filter<S, P>
where
    S: Sequence,
    P: Predicate<S::Item>,
{
    type Item = S::Item;

    fn next_item(&mut self) -> Result<Option<S::Item>> {
        while let Some(item) = self.upstream.next_item()? {
            if self.predicate.test(&item) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn close(&mut self) {
        self.upstream.close();
    }

    fn name(&self) -> &str {
        "filter"
    }
}

/// Options applied when compiling a [`Matcher`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match regardless of letter case
    pub case_insensitive: bool,
    /// Select lines that do NOT match
    pub invert: bool,
}

/// A content pattern compiled once and reused for every line.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    invert: bool,
}

impl Matcher {
    /// Compile `pattern`, failing eagerly on malformed input.
    pub fn compile(pattern: &str, options: MatchOptions) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(options.case_insensitive)
            .build()
            .map_err(|source| PipelineError::Predicate {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            regex,
            invert: options.invert,
        })
    }

    /// Whether `text` is selected (a regex search, honoring inversion).
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.invert
    }
}

impl Predicate<str> for Matcher {
    fn test(&self, item: &str) -> bool {
        self.is_match(item)
    }
}

impl Predicate<String> for Matcher {
    fn test(&self, item: &String) -> bool {
        self.is_match(item)
    }
}

impl Predicate<LocatedLine> for Matcher {
    fn test(&self, item: &LocatedLine) -> bool {
        self.is_match(&item.text)
    }
}
