//! Built-in value categories and their default behaviors.
//!
//! Every primitive, text and raw-pointer type belongs to exactly one
//! [`Category`] and gets a default equality, hash and display through the
//! [`DefaultEq`], [`DefaultHash`] and [`DefaultDisplay`] capabilities.
//! Composite types implement none of them, so asking for default behavior
//! on a struct is rejected by the compiler:
//!
//! ```compile_fail
//! use dispatch_containers::Vector;
//!
//! struct Student {
//!     id: u32,
//! }
//!
//! let mut v: Vector<Student> = Vector::new();
//! v.push(Student { id: 1 });
//! ```
//!
//! Hashes are 32 bits wide. Values of 32 bits or less hash to their bit
//! pattern (sign-extended for signed types); wider values fold their two
//! halves together with XOR; text runs a `h * 31 + byte` accumulator.

use core::ffi::CStr;
use core::fmt;
use core::ptr::NonNull;
use std::ffi::CString;

/// Closed set of value kinds with a default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Bool,
    Char,
    Signed { bits: u32 },
    Unsigned { bits: u32 },
    Float { bits: u32 },
    /// Byte strings compared and hashed by content.
    Text,
    /// Anything addressed by pointer; compared and hashed by address.
    Pointer,
}

/// Types resolved to a built-in [`Category`].
pub trait Categorized {
    const CATEGORY: Category;
}

/// Default equality for built-in categories. Every implementor declares
/// its [`Category`] alongside.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no built-in equality",
    label = "no default behavior for `{Self}`",
    note = "only primitives, text and raw pointers have default behavior; pass an explicit `VectorTable`/`MapTable` or implement the behavior trait for a type of your own"
)]
pub trait DefaultEq: Categorized {
    fn default_eq(&self, other: &Self) -> bool;
}

/// Default 32-bit hash, consistent with [`DefaultEq`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no built-in hash",
    label = "no default hash for `{Self}`",
    note = "only primitives, text and raw pointers have default behavior; pass an explicit `MapTable` or implement `MapBehavior` for a type of your own"
)]
pub trait DefaultHash: DefaultEq {
    fn default_hash(&self) -> u32;
}

/// Default textual rendering used by container display.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no built-in display",
    label = "no default display for `{Self}`",
    note = "only primitives, text, raw pointers and containers have default display; pass an explicit `VectorTable`/`MapTable`"
)]
pub trait DefaultDisplay {
    fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Folds a 64-bit pattern into 32 bits by XOR of its halves.
#[inline]
pub fn hash_wide(bits: u64) -> u32 {
    (bits as u32) ^ ((bits >> 32) as u32)
}

/// Polynomial text hash: `h = h * 31 + byte` over every byte.
///
/// Bytes are added as unsigned values, so text above ASCII hashes
/// differently than a signed-`char` accumulator would.
#[inline]
pub fn hash_text(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}

#[inline]
fn hash_pointer_sized(bits: usize) -> u32 {
    if usize::BITS <= 32 {
        bits as u32
    } else {
        hash_wide(bits as u64)
    }
}

macro_rules! integer {
    ($($t:ty => $cat:expr, $hash:expr;)*) => {$(
        impl Categorized for $t {
            const CATEGORY: Category = $cat;
        }
        impl DefaultEq for $t {
            #[inline]
            fn default_eq(&self, other: &Self) -> bool {
                self == other
            }
        }
        impl DefaultHash for $t {
            #[inline]
            fn default_hash(&self) -> u32 {
                let hash: fn($t) -> u32 = $hash;
                hash(*self)
            }
        }
        impl DefaultDisplay for $t {
            fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self)
            }
        }
    )*};
}

integer! {
    i8 => Category::Signed { bits: 8 }, |v| v as i32 as u32;
    i16 => Category::Signed { bits: 16 }, |v| v as i32 as u32;
    i32 => Category::Signed { bits: 32 }, |v| v as u32;
    i64 => Category::Signed { bits: 64 }, |v| hash_wide(v as u64);
    isize => Category::Signed { bits: isize::BITS }, |v| hash_pointer_sized(v as usize);
    u8 => Category::Unsigned { bits: 8 }, |v| v as u32;
    u16 => Category::Unsigned { bits: 16 }, |v| v as u32;
    u32 => Category::Unsigned { bits: 32 }, |v| v;
    u64 => Category::Unsigned { bits: 64 }, |v| hash_wide(v);
    usize => Category::Unsigned { bits: usize::BITS }, hash_pointer_sized;
}

impl Categorized for bool {
    const CATEGORY: Category = Category::Bool;
}

impl DefaultEq for bool {
    #[inline]
    fn default_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl DefaultHash for bool {
    #[inline]
    fn default_hash(&self) -> u32 {
        u32::from(*self)
    }
}

impl DefaultDisplay for bool {
    fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if *self { "true" } else { "false" })
    }
}

impl Categorized for char {
    const CATEGORY: Category = Category::Char;
}

impl DefaultEq for char {
    #[inline]
    fn default_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl DefaultHash for char {
    #[inline]
    fn default_hash(&self) -> u32 {
        u32::from(*self)
    }
}

impl DefaultDisplay for char {
    fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self)
    }
}

// Floats compare by bit pattern so that equal values always hash alike.
macro_rules! float {
    ($($t:ty => $bits:expr, $hash:expr;)*) => {$(
        impl Categorized for $t {
            const CATEGORY: Category = Category::Float { bits: $bits };
        }
        impl DefaultEq for $t {
            #[inline]
            fn default_eq(&self, other: &Self) -> bool {
                self.to_bits() == other.to_bits()
            }
        }
        impl DefaultHash for $t {
            #[inline]
            fn default_hash(&self) -> u32 {
                let hash: fn($t) -> u32 = $hash;
                hash(*self)
            }
        }
        impl DefaultDisplay for $t {
            fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.6}", self)
            }
        }
    )*};
}

float! {
    f32 => 32, |v| v.to_bits();
    f64 => 64, |v| hash_wide(v.to_bits());
}

macro_rules! text {
    ($($t:ty, $bytes:expr, $show:expr;)*) => {$(
        impl Categorized for $t {
            const CATEGORY: Category = Category::Text;
        }
        impl DefaultEq for $t {
            #[inline]
            fn default_eq(&self, other: &Self) -> bool {
                let bytes: fn(&Self) -> &[u8] = $bytes;
                bytes(self) == bytes(other)
            }
        }
        impl DefaultHash for $t {
            #[inline]
            fn default_hash(&self) -> u32 {
                let bytes: fn(&Self) -> &[u8] = $bytes;
                hash_text(bytes(self))
            }
        }
        impl DefaultDisplay for $t {
            fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let show: fn(&Self, &mut fmt::Formatter<'_>) -> fmt::Result = $show;
                f.write_str("\"")?;
                show(self, f)?;
                f.write_str("\"")
            }
        }
    )*};
}

text! {
    &str, |s| s.as_bytes(), |s, f| f.write_str(s);
    String, |s| s.as_bytes(), |s, f| f.write_str(s);
    &CStr, |s| s.to_bytes(), |s, f| f.write_str(&s.to_string_lossy());
    CString, |s| s.as_bytes(), |s, f| f.write_str(&s.to_string_lossy());
}

macro_rules! pointer {
    ($($t:ident;)*) => {$(
        impl<T: ?Sized> Categorized for $t<T> {
            const CATEGORY: Category = Category::Pointer;
        }
        impl<T: ?Sized> DefaultEq for $t<T> {
            #[inline]
            fn default_eq(&self, other: &Self) -> bool {
                core::ptr::addr_eq(self.as_const_ptr(), other.as_const_ptr())
            }
        }
        impl<T: ?Sized> DefaultHash for $t<T> {
            #[inline]
            fn default_hash(&self) -> u32 {
                hash_pointer_sized(self.as_const_ptr().cast::<()>() as usize)
            }
        }
        impl<T: ?Sized> DefaultDisplay for $t<T> {
            fn default_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:p}", self.as_const_ptr().cast::<()>())
            }
        }
    )*};
}

/// Uniform view of the pointer-like built-ins.
trait AsConstPtr<T: ?Sized> {
    fn as_const_ptr(&self) -> *const T;
}

impl<T: ?Sized> AsConstPtr<T> for *const T {
    fn as_const_ptr(&self) -> *const T {
        *self
    }
}

impl<T: ?Sized> AsConstPtr<T> for *mut T {
    fn as_const_ptr(&self) -> *const T {
        self.cast_const()
    }
}

impl<T: ?Sized> AsConstPtr<T> for NonNull<T> {
    fn as_const_ptr(&self) -> *const T {
        self.as_ptr().cast_const()
    }
}

type ConstPtr<T> = *const T;
type MutPtr<T> = *mut T;

pointer! {
    ConstPtr;
    MutPtr;
    NonNull;
}
