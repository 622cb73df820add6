//! dispatch-containers: a growable array and a chained hash map whose
//! per-type behavior (equality, hashing, display) is bound once per
//! instantiated type and shared by every instance.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one generic implementation per container, specialized by the
//!   compiler, with a uniform operation surface for every element type and
//!   safe defaults for built-in value kinds.
//! - Layers:
//!   - `category`: closed set of built-in value categories (bool, char,
//!     integers, floats, text, raw pointers) and their default equality,
//!     hash and display.
//!   - `dispatch`: the behavior bundle a container is instantiated with.
//!     `Defaults` resolves through `category`; `VectorTable`/`MapTable` are
//!     explicit function-pointer tables for composite types.
//!   - `vector`: `Vector<T, B>`, contiguous storage with doubling growth.
//!   - `chained_map`: `ChainedMap<K, V, B>`, power-of-two buckets with
//!     separate chaining and cached hashes.
//!   - `cursor`: the before-first / advance / current traversal protocol
//!     shared by both containers.
//!
//! Constraints
//! - Single-threaded value holders; no internal synchronization.
//! - Default behavior for a type outside the built-in categories is a
//!   compile error, reported at construction.
//! - Map bucket counts are powers of two. An explicit non-power-of-two
//!   capacity is fatal (`with_capacity` panics); `try_with_capacity`
//!   reports it as `CapacityError` instead.
//! - Positional and key misses are soft: `Option`/`Result`, never a panic.
//!
//! Borrow lifetimes
//! - `Vector::get`/`last` borrow the whole vector; a push that could move
//!   the buffer cannot run while such a borrow is alive.
//! - Map lookups borrow the map the same way, but a `Handle` outlives
//!   them: it keeps resolving across resizes (entries are relinked, never
//!   moved) and stops resolving once its entry is removed or the map is
//!   cleared.
//!
//! Hashing and rehashing
//! - Hashes are 32 bits. Each map entry stores its hash; lookups compare
//!   the stored hash before calling the key equality, and resizing uses it
//!   directly. A stored key is never hashed again after insertion.
//!
//! Notes and non-goals
//! - Map traversal order follows buckets and chains. It is unspecified and
//!   must not be relied upon; no insertion or sorted order is offered.
//! - Capacity never shrinks: `clear` keeps the vector's allocation and the
//!   map's bucket array.
//! - Explicit `free` methods exist for symmetry with `clear`; dropping a
//!   container releases the same storage.

pub mod category;
mod chained_map_proptest;
pub mod chained_map;
pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod vector;

// Public surface
pub use category::{Category, Categorized, DefaultDisplay, DefaultEq, DefaultHash};
pub use chained_map::{ChainedMap, Handle, MapCursor, DEFAULT_MAP_CAPACITY};
pub use cursor::{Cursor, CursorIter};
pub use dispatch::{Defaults, MapBehavior, MapTable, VectorBehavior, VectorTable};
pub use error::{CapacityError, IndexError};
pub use vector::{Vector, VectorCursor, DEFAULT_VECTOR_CAPACITY};
