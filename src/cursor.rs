//! Explicit traversal cursors.
//!
//! A cursor starts before the first element. [`Cursor::advance`] moves it
//! forward and reports whether it landed on an element; [`Cursor::current`]
//! reads that element. A cursor is single-pass: once `advance` has returned
//! `false` it stays exhausted, and a fresh one must be taken to traverse
//! again. Cursors hold a shared borrow of their container, so structural
//! mutation during traversal does not compile.

use core::iter::FusedIterator;

pub trait Cursor {
    type Item;

    /// Moves to the next element. Returns `false` once traversal is over.
    fn advance(&mut self) -> bool;

    /// The element under the cursor; `None` before the first successful
    /// `advance` and after exhaustion.
    fn current(&self) -> Option<Self::Item>;
}

/// Adapts a [`Cursor`] to [`Iterator`].
#[derive(Debug, Clone)]
pub struct CursorIter<C> {
    cursor: C,
}

impl<C> CursorIter<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }

    pub fn into_cursor(self) -> C {
        self.cursor
    }
}

impl<C: Cursor> Iterator for CursorIter<C> {
    type Item = C::Item;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.advance() {
            self.cursor.current()
        } else {
            None
        }
    }
}

impl<C: Cursor> FusedIterator for CursorIter<C> {}

#[cfg(test)]
mod tests {
    use super::*;

    // Counts down from `left`; `current` is only defined while positioned.
    struct Countdown {
        left: u32,
        at: Option<u32>,
    }

    impl Cursor for Countdown {
        type Item = u32;

        fn advance(&mut self) -> bool {
            if self.left == 0 {
                self.at = None;
                return false;
            }
            self.at = Some(self.left);
            self.left -= 1;
            true
        }

        fn current(&self) -> Option<u32> {
            self.at
        }
    }

    #[test]
    fn adapter_yields_until_exhausted() {
        let it = CursorIter::new(Countdown { left: 3, at: None });
        assert_eq!(it.collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn adapter_stays_fused() {
        let mut it = CursorIter::new(Countdown { left: 1, at: None });
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert_eq!(it.into_cursor().current(), None);
    }
}
