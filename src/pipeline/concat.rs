//! Concatenation stage: flattens a sequence of sequences into one.

use super::stage::Sequence;
use crate::errors::Result;

/// Flattens `Sequence<Sequence<T>>` into `Sequence<T>`.
///
/// The next outer item is pulled only once the current inner sequence is
/// exhausted, and the exhausted inner sequence is closed before that pull.
/// Empty inner sequences contribute nothing. Errors from either level are
/// returned unchanged.
pub struct Concat<S: Sequence> {
    outer: S,
    current: Option<S::Item>,
}

impl<S> Concat<S>
where
    S: Sequence,
    S::Item: Sequence,
{
    pub fn new(outer: S) -> Self {
        Self {
            outer,
            current: None,
        }
    }

    fn release_current(&mut self) {
        if let Some(mut inner) = self.current.take() {
            inner.close();
        }
    }
}

impl<S> Sequence for Concat<S>
where
    S: Sequence,
    S::Item: Sequence,
{
    type Item = <S::Item as Sequence>::Item;

    fn next_item(&mut self) -> Result<Option<Self::Item>> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                match inner.next_item() {
                    Ok(Some(item)) => return Ok(Some(item)),
                    Ok(None) => self.release_current(),
                    Err(err) => {
                        self.release_current();
                        return Err(err);
                    }
                }
            }

            match self.outer.next_item()? {
                Some(inner) => self.current = Some(inner),
                None => return Ok(None),
            }
        }
    }

    fn close(&mut self) {
        self.release_current();
        self.outer.close();
    }

    fn name(&self) -> &str {
        "concat"
    }
}
