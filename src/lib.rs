//! # lean-collections
//!
//! A growable array and a chained hash map for hosts that only provide a
//! global allocator (`no_std` + `alloc`).
//!
//! - [`Vector`]: contiguous buffer with explicit capacity control.
//! - [`Map`]: fixed slot count, separate chaining, buckets pooled in
//!   64-bucket chunks. Hash and equality are stateless strategy types bound
//!   at compile time.
//! - [`hash`]: FNV-1a parameterized by word width, plus text and integer key
//!   strategies.
//! - [`traits`]: numeric classification, conditional type selection and small
//!   value helpers.
//!
//! Nothing here is thread-safe beyond what `Send`/`Sync` express, and any
//! mutation may invalidate references previously returned by a container.
//!
//! ## Example
//!
//! ```rust
//! use lean_collections::{StrMap, Vector};
//!
//! let mut v: Vector<u32> = Vector::new();
//! for i in 0..1000 {
//!     v.push(i);
//! }
//! assert_eq!((*v.front(), *v.back()), (0, 999));
//!
//! let mut m: StrMap<&str, i32> = StrMap::with_slots(4);
//! m.insert("a", 1);
//! m.insert("b", 2);
//! assert_eq!(m.find(&"b"), Some(&2));
//! assert_eq!(m.find(&"d"), None);
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod error;
pub mod hash;
pub mod map;
pub mod traits;
pub mod vector;

pub use error::TryReserveError;
pub use hash::{IdentityHash, KeyEq, KeyHash, NativeEq, StrEq, StrHash};
pub use map::{Map, StrMap};
pub use vector::Vector;

#[cfg(test)]
mod proptests;
