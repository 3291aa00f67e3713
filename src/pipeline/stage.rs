//! The pull-based `Sequence` abstraction that every pipeline stage implements.
//!
//! A sequence is a forward-only, single-pass stream of items. Each call to
//! [`Sequence::next_item`] does exactly enough upstream work to produce one
//! item, or reports exhaustion with `Ok(None)`. Stages are plain structs that
//! own their upstream sequence, so composing stages builds a chain of values:
//!
//! ```rust,ignore
//! let lines = PathFinder::new("logs", "*.log*")?
//!     .open_with(registry)      // Sequence<OpenSource>
//!     .concat()                 // Sequence<Line>
//!     .filter_by(matcher)       // Sequence<Line>
//!     .limit(10);
//! ```
//!
//! # Resource release
//!
//! Stages that hold resources release them in [`Sequence::close`]. Closing is
//! idempotent and propagates upstream; dropping a stage releases the same
//! resources through the owned values' `Drop` impls.

use crate::errors::Result;

use super::concat::Concat;
use super::filter::{Filter, Predicate};
use super::limit::Limit;

/// A lazily produced, single-pass stream of items.
pub trait Sequence {
    type Item;

    /// Produce the next item, `Ok(None)` once exhausted.
    fn next_item(&mut self) -> Result<Option<Self::Item>>;

    /// Release any resources held by this stage and its upstream.
    ///
    /// Must be safe to call more than once. A closed sequence reports
    /// exhaustion on subsequent pulls.
    fn close(&mut self) {}

    /// Get the stage name for logging.
    fn name(&self) -> &str {
        "sequence"
    }
}

impl<S: Sequence + ?Sized> Sequence for Box<S> {
    type Item = S::Item;

    fn next_item(&mut self) -> Result<Option<Self::Item>> {
        (**self).next_item()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Type-erased sequence used at the composition root.
pub type BoxSequence<T> = Box<dyn Sequence<Item = T> + Send>;

/// Sequence over an infallible iterator.
///
/// Useful for feeding synthetic inputs (paths, nested sequences) into a stage.
pub struct IterSequence<I> {
    iter: Option<I>,
}

impl<I: Iterator> IterSequence<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: Some(iter.into_iter()),
        }
    }
}

impl<I: Iterator> Sequence for IterSequence<I> {
    type Item = I::Item;

    fn next_item(&mut self) -> Result<Option<Self::Item>> {
        Ok(self.iter.as_mut().and_then(Iterator::next))
    }

    fn close(&mut self) {
        self.iter = None;
    }

    fn name(&self) -> &str {
        "iter"
    }
}

/// Sequence over an iterator of results; errors are returned as-is.
pub struct ResultSequence<I> {
    iter: Option<I>,
}

impl<T, I> ResultSequence<I>
where
    I: Iterator<Item = Result<T>>,
{
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            iter: Some(iter.into_iter()),
        }
    }
}

impl<T, I> Sequence for ResultSequence<I>
where
    I: Iterator<Item = Result<T>>,
{
    type Item = T;

    fn next_item(&mut self) -> Result<Option<T>> {
        self.iter.as_mut().and_then(Iterator::next).transpose()
    }

    fn close(&mut self) {
        self.iter = None;
    }

    fn name(&self) -> &str {
        "results"
    }
}

/// Create a sequence from any iterable.
pub fn from_iter<I: IntoIterator>(iter: I) -> IterSequence<I::IntoIter> {
    IterSequence::new(iter)
}

/// Create a sequence from an iterable of results.
pub fn from_results<T, I>(iter: I) -> ResultSequence<I::IntoIter>
where
    I: IntoIterator<Item = Result<T>>,
{
    ResultSequence::new(iter)
}

/// Stage applying a function to every item.
pub struct Map<S, F> {
    upstream: S,
    func: F,
}

impl<S, F, U> Sequence for Map<S, F>
where
    S: Sequence,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn next_item(&mut self) -> Result<Option<U>> {
        Ok(self.upstream.next_item()?.map(&mut self.func))
    }

    fn close(&mut self) {
        self.upstream.close();
    }

    fn name(&self) -> &str {
        self.upstream.name()
    }
}

/// `Iterator` view over a sequence.
///
/// Yields `Err` at most once: after an error or exhaustion the iterator is
/// fused and the underlying sequence is closed.
pub struct Items<S> {
    sequence: S,
    done: bool,
}

impl<S: Sequence> Items<S> {
    /// Stop iterating early and release upstream resources.
    pub fn close(&mut self) {
        if !self.done {
            self.done = true;
            self.sequence.close();
        }
    }
}

impl<S: Sequence> Iterator for Items<S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.sequence.next_item() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.close();
                None
            }
            Err(err) => {
                self.close();
                Some(Err(err))
            }
        }
    }
}

impl<S: Sequence> std::iter::FusedIterator for Items<S> {}

/// Combinators for composing stages.
pub trait SequenceExt: Sequence + Sized {
    /// Flatten a sequence of sequences.
    fn concat(self) -> Concat<Self>
    where
        Self::Item: Sequence,
    {
        Concat::new(self)
    }

    /// Keep only the items accepted by `predicate`.
    fn filter_by<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: Predicate<Self::Item>,
    {
        Filter::new(self, predicate)
    }

    /// Yield at most `count` items, closing upstream as soon as the last one
    /// has been produced.
    fn limit(self, count: usize) -> Limit<Self> {
        Limit::new(self, count)
    }

    /// Apply `func` to every item.
    fn map_items<F, U>(self, func: F) -> Map<Self, F>
    where
        F: FnMut(Self::Item) -> U,
    {
        Map {
            upstream: self,
            func,
        }
    }

    /// Consume as a standard iterator.
    fn into_items(self) -> Items<Self> {
        Items {
            sequence: self,
            done: false,
        }
    }

    /// Erase the concrete stage type.
    fn boxed(self) -> BoxSequence<Self::Item>
    where
        Self: Send + 'static,
    {
        Box::new(self)
    }

    /// Pull every remaining item into a vector.
    fn collect_items(self) -> Result<Vec<Self::Item>> {
        self.into_items().collect()
    }
}

impl<S: Sequence> SequenceExt for S {}
