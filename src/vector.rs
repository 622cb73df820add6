//! Vector: contiguous growable array with behavior-driven search and display.
//!
//! Capacity is tracked explicitly and only ever doubles; `clear` and `pop`
//! keep the allocation. Borrows returned by `get`/`last` tie up the whole
//! vector, so a push that could move the buffer cannot run while one is
//! alive:
//!
//! ```compile_fail
//! use dispatch_containers::Vector;
//!
//! let mut v: Vector<i32> = Vector::new();
//! v.push(0);
//! let r = v.get(0);
//! v.push(1);
//! r;
//! ```
//!
//! A live cursor blocks mutation the same way:
//!
//! ```compile_fail
//! use dispatch_containers::{Cursor, Vector};
//!
//! let mut v: Vector<i32> = Vector::new();
//! let c = v.cursor();
//! v.clear();
//! c.current();
//! ```

use crate::category::DefaultDisplay;
use crate::cursor::{Cursor, CursorIter};
use crate::dispatch::{Defaults, VectorBehavior};
use crate::error::IndexError;
use core::fmt;
use tracing::{debug, trace};

pub const DEFAULT_VECTOR_CAPACITY: usize = 10;

#[derive(Clone)]
pub struct Vector<T, B = Defaults> {
    behavior: B,
    data: Vec<T>,
    capacity: usize, // logical slot count; only grows by doubling
}

/// Forward traversal over a [`Vector`] in index order.
pub type Iter<'a, T> = CursorIter<VectorCursor<'a, T>>;

impl<T> Vector<T>
where
    Defaults: VectorBehavior<T>,
{
    pub fn new() -> Self {
        Self::with_behavior(Defaults)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_behavior(capacity, Defaults)
    }
}

impl<T> Default for Vector<T>
where
    Defaults: VectorBehavior<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, B> Vector<T, B>
where
    B: VectorBehavior<T>,
{
    pub fn with_behavior(behavior: B) -> Self {
        Self {
            behavior,
            data: Vec::with_capacity(DEFAULT_VECTOR_CAPACITY),
            capacity: DEFAULT_VECTOR_CAPACITY,
        }
    }

    /// A zero capacity is accepted; the first push grows it to one slot.
    pub fn with_capacity_and_behavior(capacity: usize, behavior: B) -> Self {
        if capacity != DEFAULT_VECTOR_CAPACITY {
            debug!(capacity, "vector created with explicit capacity");
        }
        Self {
            behavior,
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn grow(&mut self) {
        let from = self.capacity;
        self.capacity = from.saturating_mul(2).max(1);
        self.data.reserve_exact(self.capacity - self.data.len());
        trace!(from, to = self.capacity, len = self.data.len(), "vector grew");
    }

    /// Appends `value`, doubling capacity first when full.
    pub fn push(&mut self, value: T) {
        if self.data.len() == self.capacity {
            self.grow();
        }
        self.data.push(value);
    }

    /// Removes and returns the last element. Capacity is unchanged.
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    pub fn last(&self) -> Option<&T> {
        self.data.last()
    }

    /// Overwrites the element at `index` and returns the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, IndexError> {
        let len = self.data.len();
        match self.data.get_mut(index) {
            Some(slot) => Ok(core::mem::replace(slot, value)),
            None => Err(IndexError::OutOfRange { index, len }),
        }
    }

    /// Inserts at `index` (`index <= len`), shifting later elements right.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), IndexError> {
        let len = self.data.len();
        if index > len {
            return Err(IndexError::OutOfRange { index, len });
        }
        if len == self.capacity {
            self.grow();
        }
        self.data.insert(index, value);
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements left.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.data.len() {
            Some(self.data.remove(index))
        } else {
            None
        }
    }

    /// Position of the first element equal to `value` under the behavior.
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.data
            .iter()
            .position(|e| self.behavior.equals(e, value))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }

    /// Removes the first element equal to `value`.
    pub fn remove_element(&mut self, value: &T) -> Option<T> {
        let index = self.index_of(value)?;
        self.remove(index)
    }

    /// Drops every element; the allocation and capacity are kept.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn cursor(&self) -> VectorCursor<'_, T> {
        VectorCursor::new(&self.data)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        CursorIter::new(self.cursor())
    }

    /// Releases the buffer. Equivalent to dropping the vector.
    pub fn free(self) {}
}

impl<T, B> fmt::Display for Vector<T, B>
where
    B: VectorBehavior<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, e) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.behavior.fmt_element(e, f)?;
        }
        f.write_str("]")
    }
}

impl<T, B> DefaultDisplay for Vector<T, B>
where
    B: VectorBehavior<T>,
{
    fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<T: fmt::Debug, B> fmt::Debug for Vector<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("len", &self.data.len())
            .field("capacity", &self.capacity)
            .field("elements", &self.data)
            .finish()
    }
}

impl<T, B> Extend<T> for Vector<T, B>
where
    B: VectorBehavior<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for Vector<T>
where
    Defaults: VectorBehavior<T>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Vector::new();
        v.extend(iter);
        v
    }
}

impl<'a, T, B> IntoIterator for &'a Vector<T, B>
where
    B: VectorBehavior<T>,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Index cursor over a vector's elements.
#[derive(Debug, Clone)]
pub struct VectorCursor<'a, T> {
    items: &'a [T],
    // 0: before the first element; n: on index n - 1; len + 1: exhausted.
    position: usize,
}

impl<'a, T> VectorCursor<'a, T> {
    fn new(items: &'a [T]) -> Self {
        Self { items, position: 0 }
    }

    /// Index of the current element, if positioned on one.
    pub fn index(&self) -> Option<usize> {
        match self.position {
            0 => None,
            p if p > self.items.len() => None,
            p => Some(p - 1),
        }
    }
}

impl<'a, T> Cursor for VectorCursor<'a, T> {
    type Item = &'a T;

    fn advance(&mut self) -> bool {
        if self.position < self.items.len() {
            self.position += 1;
            true
        } else {
            self.position = self.items.len() + 1;
            false
        }
    }

    fn current(&self) -> Option<&'a T> {
        let items = self.items;
        self.index().map(|i| &items[i])
    }
}
