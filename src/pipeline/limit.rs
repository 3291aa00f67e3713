//! Limit stage: stop after a fixed number of items.

use super::stage::Sequence;
use crate::errors::Result;

/// Yields at most `remaining` items.
///
/// Upstream is closed as soon as the last permitted item is produced, so an
/// open source is released without waiting for another pull.
pub struct Limit<S> {
    upstream: S,
    remaining: usize,
}

impl<S: Sequence> Limit<S> {
    pub fn new(mut upstream: S, count: usize) -> Self {
        if count == 0 {
            upstream.close();
        }
        Self {
            upstream,
            remaining: count,
        }
    }
}

impl<S: Sequence> Sequence for Limit<S> {
    type Item = S::Item;

    fn next_item(&mut self) -> Result<Option<S::Item>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        match self.upstream.next_item()? {
            Some(item) => {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.upstream.close();
                }
                Ok(Some(item))
            }
            None => {
                self.remaining = 0;
                Ok(None)
            }
        }
    }

    fn close(&mut self) {
        self.remaining = 0;
        self.upstream.close();
    }

    fn name(&self) -> &str {
        "limit"
    }
}
