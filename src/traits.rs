//! Type-level helpers and small value utilities.
//!
//! Rust already moves by value, so there is no `move`/`forward` here: passing
//! a `T` by value is the move, and generic by-value parameters forward.

use core::mem;

// =============================================================================
// Numeric classification
// =============================================================================

/// Primitive numeric type (integer or float).
pub trait Arithmetic: Copy + PartialOrd {
    const INTEGRAL: bool;
    const FLOAT: bool;
    const SIGNED: bool;
}

/// Primitive integer.
pub trait Integral: Arithmetic + Eq {
    /// Unsigned integer of the same width.
    type Unsigned: Integral;

    /// Value converted with `as usize` (truncating or sign-extending).
    fn as_usize(self) -> usize;
}

/// Primitive floating point number.
pub trait Float: Arithmetic {}

macro_rules! impl_integral {
    ($($t:ty => $u:ty, $signed:expr;)*) => {$(
        impl Arithmetic for $t {
            const INTEGRAL: bool = true;
            const FLOAT: bool = false;
            const SIGNED: bool = $signed;
        }

        impl Integral for $t {
            type Unsigned = $u;

            #[inline]
            fn as_usize(self) -> usize {
                self as usize
            }
        }
    )*};
}

impl_integral! {
    u8 => u8, false;
    u16 => u16, false;
    u32 => u32, false;
    u64 => u64, false;
    u128 => u128, false;
    usize => usize, false;
    i8 => u8, true;
    i16 => u16, true;
    i32 => u32, true;
    i64 => u64, true;
    i128 => u128, true;
    isize => usize, true;
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Arithmetic for $t {
            const INTEGRAL: bool = false;
            const FLOAT: bool = true;
            const SIGNED: bool = true;
        }

        impl Float for $t {}
    )*};
}

impl_float!(f32, f64);

pub const fn is_integral<T: Arithmetic>() -> bool {
    T::INTEGRAL
}

pub const fn is_float<T: Arithmetic>() -> bool {
    T::FLOAT
}

pub const fn is_arithmetic<T: Arithmetic>() -> bool {
    T::INTEGRAL || T::FLOAT
}

pub const fn is_signed<T: Arithmetic>() -> bool {
    T::SIGNED
}

/// Same-width unsigned counterpart of an integer type.
pub type MakeUnsigned<T> = <T as Integral>::Unsigned;

// =============================================================================
// Conditional type selection
// =============================================================================

/// Type-level boolean used as a selector.
pub struct Cond<const B: bool>;

/// Picks `T` for `Cond<true>` and `F` for `Cond<false>`.
pub trait Select<T, F> {
    type Output;
}

impl<T, F> Select<T, F> for Cond<true> {
    type Output = T;
}

impl<T, F> Select<T, F> for Cond<false> {
    type Output = F;
}

/// `T` if `B`, else `F`.
pub type Conditional<const B: bool, T, F> = <Cond<B> as Select<T, F>>::Output;

// =============================================================================
// Value utilities
// =============================================================================

/// Stores `new` into `dest` and returns the previous value.
#[inline]
pub fn exchange<T, U: Into<T>>(dest: &mut T, new: U) -> T {
    mem::replace(dest, new.into())
}

#[inline]
pub fn swap<T>(a: &mut T, b: &mut T) {
    mem::swap(a, b);
}

/// Returns `a` if `a < b`, otherwise `b` (so `b` wins ties and unordered pairs).
#[inline]
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

/// Returns `a` if `a > b`, otherwise `b`.
#[inline]
pub fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}
