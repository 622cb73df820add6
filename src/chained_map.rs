//! ChainedMap: power-of-two bucket array with separate chaining.
//!
//! Entries live in a slot map and are linked into per-bucket chains by
//! generational key. Each entry caches its hash at insertion; resizing
//! relinks keys into the doubled bucket array using the cached hash and
//! never moves or rehashes an entry. That is what makes [`Handle`] stable
//! across growth: it stops resolving only when its entry is removed or the
//! map is cleared.
//!
//! Traversal order is bucket index, then chain order. It depends on hash
//! values and resize history, not insertion order, and is unspecified.
//!
//! Cursors and value references borrow the map, so `put` cannot run while
//! one is alive:
//!
//! ```compile_fail
//! use dispatch_containers::{ChainedMap, Cursor};
//!
//! let mut m: ChainedMap<u32, u32> = ChainedMap::new();
//! let c = m.cursor();
//! m.put(1, 1);
//! c.current();
//! ```
//!
//! A [`Handle`] holds no borrow and keeps resolving across growth:
//!
//! ```
//! use dispatch_containers::ChainedMap;
//!
//! let mut m: ChainedMap<u32, u32> = ChainedMap::with_capacity(1);
//! let h = m.put_handle(0, 7);
//! for i in 1..32 {
//!     m.put(i, i);
//! }
//! assert_eq!(h.value(&m), Some(&7));
//! ```
//!
//! Composite keys have no default hash or equality; they need a
//! [`MapTable`](crate::MapTable) or a hand-written behavior:
//!
//! ```compile_fail
//! use dispatch_containers::ChainedMap;
//!
//! struct Student {
//!     id: u32,
//! }
//!
//! let mut m = ChainedMap::<Student, i32>::new();
//! m.put(Student { id: 1 }, 1);
//! ```

use crate::category::DefaultDisplay;
use crate::cursor::{Cursor, CursorIter};
use crate::dispatch::{Defaults, MapBehavior};
use crate::error::CapacityError;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};
use tracing::{debug, error, trace};

pub const DEFAULT_MAP_CAPACITY: usize = 16;

// Load factor 3/4: grow when len * LOAD_DEN >= buckets * LOAD_NUM.
const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

/// Stable reference to one entry, valid across resizes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub fn key<'a, K, V, B>(&self, map: &'a ChainedMap<K, V, B>) -> Option<&'a K> {
        map.entries.get(self.0).map(|e| &e.key)
    }

    pub fn value<'a, K, V, B>(&self, map: &'a ChainedMap<K, V, B>) -> Option<&'a V> {
        map.entries.get(self.0).map(|e| &e.value)
    }

    pub fn value_mut<'a, K, V, B>(&self, map: &'a mut ChainedMap<K, V, B>) -> Option<&'a mut V> {
        map.entries.get_mut(self.0).map(|e| &mut e.value)
    }
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u32,
    next: Option<DefaultKey>,
}

#[derive(Clone)]
pub struct ChainedMap<K, V, B = Defaults> {
    behavior: B,
    buckets: Vec<Option<DefaultKey>>, // chain heads; length is a power of two
    entries: SlotMap<DefaultKey, Entry<K, V>>,
}

/// Forward traversal over a [`ChainedMap`] in bucket order.
pub type Iter<'a, K, V> = CursorIter<MapCursor<'a, K, V>>;

impl<K, V> ChainedMap<K, V>
where
    Defaults: MapBehavior<K, V>,
{
    pub fn new() -> Self {
        Self::with_behavior(Defaults)
    }

    /// Panics unless `capacity` is a positive power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_behavior(capacity, Defaults)
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, CapacityError> {
        Self::try_with_capacity_and_behavior(capacity, Defaults)
    }
}

impl<K, V> Default for ChainedMap<K, V>
where
    Defaults: MapBehavior<K, V>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, B> ChainedMap<K, V, B>
where
    B: MapBehavior<K, V>,
{
    pub fn with_behavior(behavior: B) -> Self {
        Self::from_parts(DEFAULT_MAP_CAPACITY, behavior)
    }

    /// Panics unless `capacity` is a positive power of two; no map is
    /// produced in that case. Use [`Self::try_with_capacity_and_behavior`]
    /// to handle the error instead.
    pub fn with_capacity_and_behavior(capacity: usize, behavior: B) -> Self {
        match Self::try_with_capacity_and_behavior(capacity, behavior) {
            Ok(map) => map,
            Err(e) => {
                error!(capacity, "refusing to build map: {e}");
                panic!("{e}");
            }
        }
    }

    pub fn try_with_capacity_and_behavior(
        capacity: usize,
        behavior: B,
    ) -> Result<Self, CapacityError> {
        let capacity = CapacityError::check(capacity)?;
        if capacity != DEFAULT_MAP_CAPACITY {
            debug!(capacity, "map created with explicit capacity");
        }
        Ok(Self::from_parts(capacity, behavior))
    }

    fn from_parts(capacity: usize, behavior: B) -> Self {
        Self {
            behavior,
            buckets: vec![None; capacity],
            entries: SlotMap::with_capacity(capacity),
        }
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets; always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        (hash as usize) & (self.buckets.len() - 1)
    }

    fn over_load_factor(&self) -> bool {
        self.entries.len() * LOAD_DEN >= self.buckets.len() * LOAD_NUM
    }

    // Relinks every entry into a bucket array twice as long. Entries are
    // prepended to their new chain.
    fn grow(&mut self) {
        let from = self.buckets.len();
        let to = from * 2;
        let old = core::mem::replace(&mut self.buckets, vec![None; to]);
        let mask = to - 1;
        for head in old {
            let mut cursor = head;
            while let Some(k) = cursor {
                let entry = &mut self.entries[k];
                cursor = entry.next;
                let index = (entry.hash as usize) & mask;
                entry.next = self.buckets[index];
                self.buckets[index] = Some(k);
            }
        }
        trace!(from, to, len = self.entries.len(), "map resized");
    }

    // Walks the chain for `key`, returning (previous link, match).
    fn locate(&self, hash: u32, key: &K) -> (Option<DefaultKey>, Option<DefaultKey>) {
        let mut prev = None;
        let mut cursor = self.buckets[self.bucket_of(hash)];
        while let Some(k) = cursor {
            let entry = &self.entries[k];
            if entry.hash == hash && self.behavior.key_eq(&entry.key, key) {
                return (prev, Some(k));
            }
            prev = Some(k);
            cursor = entry.next;
        }
        (prev, None)
    }

    /// Inserts or updates `key`. Returns the replaced value on update.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.upsert(key, value).1
    }

    /// Like [`Self::put`], returning a handle to the stored entry.
    pub fn put_handle(&mut self, key: K, value: V) -> Handle {
        self.upsert(key, value).0
    }

    fn upsert(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        if self.over_load_factor() {
            self.grow();
        }
        let hash = self.behavior.hash(&key);
        let (tail, found) = self.locate(hash, &key);
        if let Some(k) = found {
            let old = core::mem::replace(&mut self.entries[k].value, value);
            return (Handle(k), Some(old));
        }
        // On a miss `locate` ends at the chain tail.
        let k = self.entries.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        match tail {
            Some(t) => self.entries[t].next = Some(k),
            None => {
                let index = self.bucket_of(hash);
                self.buckets[index] = Some(k);
            }
        }
        (Handle(k), None)
    }

    pub fn find(&self, key: &K) -> Option<Handle> {
        let hash = self.behavior.hash(key);
        self.locate(hash, key).1.map(Handle)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let k = self.find(key)?.0;
        Some(&self.entries[k].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let k = self.find(key)?.0;
        Some(&mut self.entries[k].value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Unlinks and returns the entry for `key`.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.behavior.hash(key);
        let (prev, k) = match self.locate(hash, key) {
            (prev, Some(k)) => (prev, k),
            (_, None) => return None,
        };
        let next = self.entries[k].next;
        match prev {
            Some(p) => self.entries[p].next = next,
            None => {
                let index = self.bucket_of(hash);
                self.buckets[index] = next;
            }
        }
        let entry = self.entries.remove(k)?;
        Some((entry.key, entry.value))
    }

    /// Returns whether an entry for `key` was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Drops every entry; the bucket count is kept. Outstanding handles stop
    /// resolving.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.fill(None);
    }

    pub fn cursor(&self) -> MapCursor<'_, K, V> {
        MapCursor {
            buckets: &self.buckets,
            entries: &self.entries,
            bucket: 0,
            entry: None,
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        CursorIter::new(self.cursor())
    }

    /// Mutable access to every value, in unspecified order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            it: self.entries.values_mut(),
        }
    }

    /// Releases every entry and the bucket array. Equivalent to dropping
    /// the map.
    pub fn free(self) {}
}

impl<K, V, B> fmt::Display for ChainedMap<K, V, B>
where
    B: MapBehavior<K, V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            self.behavior.fmt_key(k, f)?;
            f.write_str(": ")?;
            self.behavior.fmt_value(v, f)?;
        }
        f.write_str("}")
    }
}

impl<K, V, B> DefaultDisplay for ChainedMap<K, V, B>
where
    B: MapBehavior<K, V>,
{
    fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B> fmt::Debug for ChainedMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<_> = self.entries.values().map(|e| (&e.key, &e.value)).collect();
        f.debug_struct("ChainedMap")
            .field("len", &self.entries.len())
            .field("capacity", &self.buckets.len())
            .field("entries", &entries)
            .finish()
    }
}

impl<K, V, B> Extend<(K, V)> for ChainedMap<K, V, B>
where
    B: MapBehavior<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainedMap<K, V>
where
    Defaults: MapBehavior<K, V>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = ChainedMap::new();
        m.extend(iter);
        m
    }
}

impl<'a, K, V, B> IntoIterator for &'a ChainedMap<K, V, B>
where
    B: MapBehavior<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bucket-then-chain cursor over a map's entries.
pub struct MapCursor<'a, K, V> {
    buckets: &'a [Option<DefaultKey>],
    entries: &'a SlotMap<DefaultKey, Entry<K, V>>,
    bucket: usize, // next bucket to scan
    entry: Option<DefaultKey>,
}

impl<'a, K, V> MapCursor<'a, K, V> {
    fn current_entry(&self) -> Option<&'a Entry<K, V>> {
        let entries = self.entries;
        self.entry.map(|k| &entries[k])
    }

    pub fn current_key(&self) -> Option<&'a K> {
        self.current_entry().map(|e| &e.key)
    }

    pub fn current_value(&self) -> Option<&'a V> {
        self.current_entry().map(|e| &e.value)
    }

    pub fn current_handle(&self) -> Option<Handle> {
        self.entry.map(Handle)
    }
}

impl<'a, K, V> Cursor for MapCursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn advance(&mut self) -> bool {
        if let Some(next) = self.current_entry().and_then(|e| e.next) {
            self.entry = Some(next);
            return true;
        }
        while self.bucket < self.buckets.len() {
            self.entry = self.buckets[self.bucket];
            self.bucket += 1;
            if self.entry.is_some() {
                return true;
            }
        }
        self.entry = None;
        false
    }

    fn current(&self) -> Option<(&'a K, &'a V)> {
        self.current_entry().map(|e| (&e.key, &e.value))
    }
}

impl<K, V> Clone for MapCursor<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets,
            entries: self.entries,
            bucket: self.bucket,
            entry: self.entry,
        }
    }
}

impl<K, V> fmt::Debug for MapCursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCursor")
            .field("bucket", &self.bucket)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// Iterator over mutable values of a [`ChainedMap`].
pub struct ValuesMut<'a, K, V> {
    it: slotmap::basic::ValuesMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| &mut e.value)
    }
}
