//! Behavior binding for container instances.
//!
//! A container carries its behavior as a type parameter, the way a std map
//! carries its `BuildHasher`. The zero-sized [`Defaults`] resolves every
//! operation through the built-in category traits at compile time. For
//! composite types there are two override routes:
//!
//! - a static dispatch table ([`VectorTable`] / [`MapTable`]), built once in a
//!   `static` and shared by reference by every instance;
//! - a user type implementing [`VectorBehavior`] / [`MapBehavior`] directly.
//!
//! ```
//! use dispatch_containers::{Vector, VectorTable};
//!
//! struct Student {
//!     id: u32,
//!     name: &'static str,
//! }
//!
//! static STUDENTS: VectorTable<Student> = VectorTable::<Student>::new(
//!     |a, b| a.id == b.id,
//!     |s, f| write!(f, "Student{{id: {}, name: \"{}\"}}", s.id, s.name),
//! );
//!
//! let mut v = Vector::with_behavior(&STUDENTS);
//! v.push(Student { id: 1, name: "Ada" });
//! assert_eq!(v.to_string(), "[Student{id: 1, name: \"Ada\"}]");
//! ```

use crate::category::{DefaultDisplay, DefaultEq, DefaultHash};
use core::fmt;

/// Behavior resolved from the built-in categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Defaults;

/// Element operations needed by [`Vector`](crate::Vector).
#[diagnostic::on_unimplemented(
    message = "no element behavior for `{T}` in `{Self}`",
    label = "`{T}` is not a built-in category",
    note = "bind explicit functions with `VectorTable::new` or implement `VectorBehavior<{T}>` for a type of your own"
)]
pub trait VectorBehavior<T> {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn fmt_element(&self, value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Key and value operations needed by [`ChainedMap`](crate::ChainedMap).
///
/// `hash` must agree with `key_eq`: equal keys hash alike. A behavior that
/// breaks this makes lookups miss; the map does not detect it.
#[diagnostic::on_unimplemented(
    message = "no map behavior for keys `{K}` and values `{V}` in `{Self}`",
    label = "key or value is not a built-in category",
    note = "bind explicit functions with `MapTable::new` or implement `MapBehavior<{K}, {V}>` for a type of your own"
)]
pub trait MapBehavior<K, V> {
    fn hash(&self, key: &K) -> u32;
    fn key_eq(&self, a: &K, b: &K) -> bool;
    fn fmt_key(&self, key: &K, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn fmt_value(&self, value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> VectorBehavior<T> for Defaults
where
    T: DefaultEq + DefaultDisplay,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a.default_eq(b)
    }

    fn fmt_element(&self, value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        value.default_fmt(f)
    }
}

impl<K, V> MapBehavior<K, V> for Defaults
where
    K: DefaultHash + DefaultDisplay,
    V: DefaultDisplay,
{
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        key.default_hash()
    }

    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a.default_eq(b)
    }

    fn fmt_key(&self, key: &K, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        key.default_fmt(f)
    }

    fn fmt_value(&self, value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        value.default_fmt(f)
    }
}

pub type EqFn<T> = fn(&T, &T) -> bool;
pub type HashFn<K> = fn(&K) -> u32;
pub type DisplayFn<T> = fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result;

/// Function-pointer dispatch table for one element type.
pub struct VectorTable<T> {
    pub equals: EqFn<T>,
    pub display: DisplayFn<T>,
}

impl<T> VectorTable<T> {
    pub const fn new(equals: EqFn<T>, display: DisplayFn<T>) -> Self {
        Self { equals, display }
    }
}

impl<T: DefaultEq + DefaultDisplay> VectorTable<T> {
    /// Table bound to the built-in behavior of `T`.
    pub const fn builtin() -> Self {
        Self::new(T::default_eq, T::default_fmt)
    }
}

impl<T> Clone for VectorTable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorTable<T> {}

impl<T> fmt::Debug for VectorTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorTable")
            .field("element", &core::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> VectorBehavior<T> for &VectorTable<T> {
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }

    fn fmt_element(&self, value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.display)(value, f)
    }
}

/// Function-pointer dispatch table for one key/value pair.
pub struct MapTable<K, V> {
    pub hash: HashFn<K>,
    pub equals: EqFn<K>,
    pub display_key: DisplayFn<K>,
    pub display_value: DisplayFn<V>,
}

impl<K, V> MapTable<K, V> {
    pub const fn new(
        hash: HashFn<K>,
        equals: EqFn<K>,
        display_key: DisplayFn<K>,
        display_value: DisplayFn<V>,
    ) -> Self {
        Self {
            hash,
            equals,
            display_key,
            display_value,
        }
    }
}

impl<K, V> MapTable<K, V>
where
    K: DefaultHash + DefaultDisplay,
    V: DefaultDisplay,
{
    /// Table bound to the built-in behavior of `K` and `V`.
    pub const fn builtin() -> Self {
        Self::new(K::default_hash, K::default_eq, K::default_fmt, V::default_fmt)
    }
}

impl<K, V> Clone for MapTable<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for MapTable<K, V> {}

impl<K, V> fmt::Debug for MapTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapTable")
            .field("key", &core::any::type_name::<K>())
            .field("value", &core::any::type_name::<V>())
            .finish_non_exhaustive()
    }
}

impl<K, V> MapBehavior<K, V> for &MapTable<K, V> {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        (self.hash)(key)
    }

    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }

    fn fmt_key(&self, key: &K, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.display_key)(key, f)
    }

    fn fmt_value(&self, value: &V, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.display_value)(value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Show<'a, B, T>(&'a B, &'a T);

    impl<B: VectorBehavior<T>, T> fmt::Display for Show<'_, B, T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt_element(self.1, f)
        }
    }

    static INTS: VectorTable<i32> = VectorTable::builtin();
    static BY_LEN: VectorTable<&str> =
        VectorTable::<&str>::new(|a, b| a.len() == b.len(), |s, f| write!(f, "<{}>", s));
    static WORDS: MapTable<&str, u8> = MapTable::builtin();

    #[test]
    fn builtin_table_matches_defaults() {
        let table = &INTS;
        assert!(table.equals(&3, &3));
        assert!(!table.equals(&3, &4));
        assert_eq!(Show(&table, &-7).to_string(), "-7");
        assert_eq!(Show(&Defaults, &-7).to_string(), "-7");
    }

    #[test]
    fn explicit_table_overrides_builtin() {
        let table = &BY_LEN;
        assert!(table.equals(&"abc", &"xyz"));
        assert!(!Defaults.equals(&"abc", &"xyz"));
        assert_eq!(Show(&table, &"hi").to_string(), "<hi>");
    }

    #[test]
    fn map_table_routes_through_pointers() {
        let table = &WORDS;
        assert_eq!(table.hash(&"a"), 97);
        assert_eq!(
            MapBehavior::<&str, u8>::hash(&Defaults, &"a"),
            table.hash(&"a")
        );
        assert!(table.key_eq(&"k", &"k"));
    }

    #[test]
    fn tables_are_shared_by_reference() {
        let a: &'static VectorTable<i32> = &INTS;
        let b: &'static VectorTable<i32> = &INTS;
        assert!(core::ptr::eq(a, b));
        assert!(format!("{:?}", INTS).contains("i32"));
    }
}
