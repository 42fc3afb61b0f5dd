//! Hash and equality strategies for [`Map`](crate::Map) keys.
//!
//! Strategies are zero-sized types whose behavior lives in associated
//! functions, so a map binds them as generic parameters and never stores or
//! dispatches through an object.

use alloc::ffi::CString;
use alloc::string::String;
use alloc::vec::Vec;
use core::ffi::CStr;
use core::marker::PhantomData;
use core::ops::BitXor;

use crate::traits::{Conditional, Integral};

/// Stateless hash function over keys of type `K`.
pub trait KeyHash<K: ?Sized> {
    fn hash(key: &K) -> usize;
}

/// Stateless equality over keys of type `K`.
///
/// Must agree with the paired [`KeyHash`]: keys that compare equal have to
/// hash equal, otherwise lookups silently miss.
pub trait KeyEq<K: ?Sized> {
    fn eq(a: &K, b: &K) -> bool;
}

// =============================================================================
// FNV-1a
// =============================================================================

/// Unsigned word an FNV-1a state can be kept in.
pub trait FnvWord: Integral<Unsigned = Self> + BitXor<Output = Self> + From<u8> {
    fn wrapping_mul(self, rhs: Self) -> Self;
}

impl FnvWord for u32 {
    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        u32::wrapping_mul(self, rhs)
    }
}

impl FnvWord for u64 {
    #[inline]
    fn wrapping_mul(self, rhs: Self) -> Self {
        u64::wrapping_mul(self, rhs)
    }
}

/// Word width and constants of an FNV-1a instance.
pub trait FnvParams {
    type Word: FnvWord;
    const OFFSET_BASIS: Self::Word;
    const PRIME: Self::Word;
}

/// Standard 32-bit FNV-1a constants.
pub struct Fnv32;

impl FnvParams for Fnv32 {
    type Word = u32;
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
}

/// Standard 64-bit FNV-1a constants.
pub struct Fnv64;

impl FnvParams for Fnv64 {
    type Word = u64;
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
}

/// 32-bit FNV-1a with caller-chosen offset basis `B` and prime `P`.
pub struct FnvCustom32<const B: u32, const P: u32>;

impl<const B: u32, const P: u32> FnvParams for FnvCustom32<B, P> {
    type Word = u32;
    const OFFSET_BASIS: u32 = B;
    const PRIME: u32 = P;
}

/// 64-bit FNV-1a with caller-chosen offset basis `B` and prime `P`.
pub struct FnvCustom64<const B: u64, const P: u64>;

impl<const B: u64, const P: u64> FnvParams for FnvCustom64<B, P> {
    type Word = u64;
    const OFFSET_BASIS: u64 = B;
    const PRIME: u64 = P;
}

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("the native FNV-1a hash supports only 32-bit and 64-bit targets");

/// FNV-1a constants matching the target's pointer width.
pub type NativeFnv = Conditional<{ cfg!(target_pointer_width = "64") }, Fnv64, Fnv32>;

/// FNV-1a hash over the bytes of a key, read as a C string.
pub struct Fnv1a<P>(PhantomData<P>);

impl<P: FnvParams> Fnv1a<P> {
    /// Hashes `bytes` up to (not including) the first NUL byte.
    pub fn hash_bytes(bytes: &[u8]) -> P::Word {
        let mut hash = P::OFFSET_BASIS;
        for &b in until_nul(bytes) {
            hash = (hash ^ <P::Word as From<u8>>::from(b)).wrapping_mul(P::PRIME);
        }
        hash
    }
}

/// Native-width FNV-1a for text keys.
pub type StrHash = Fnv1a<NativeFnv>;

impl<P: FnvParams, K: ByteKey + ?Sized> KeyHash<K> for Fnv1a<P> {
    #[inline]
    fn hash(key: &K) -> usize {
        Self::hash_bytes(key.key_bytes()).as_usize()
    }
}

/// Byte-wise C string equality: bytes after an embedded NUL are ignored.
pub struct StrEq;

impl<K: ByteKey + ?Sized> KeyEq<K> for StrEq {
    #[inline]
    fn eq(a: &K, b: &K) -> bool {
        until_nul(a.key_bytes()) == until_nul(b.key_bytes())
    }
}

/// Text-like key viewed as raw bytes.
pub trait ByteKey {
    fn key_bytes(&self) -> &[u8];
}

impl ByteKey for str {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl ByteKey for [u8] {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteKey for CStr {
    fn key_bytes(&self) -> &[u8] {
        self.to_bytes()
    }
}

impl ByteKey for String {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl ByteKey for Vec<u8> {
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl ByteKey for CString {
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<T: ByteKey + ?Sized> ByteKey for &T {
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

#[inline]
fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

// =============================================================================
// Integer keys
// =============================================================================

/// Uses an integer key's own value as its hash.
pub struct IdentityHash;

impl<K: Integral> KeyHash<K> for IdentityHash {
    #[inline]
    fn hash(key: &K) -> usize {
        key.as_usize()
    }
}

/// Equality through `PartialEq`.
pub struct NativeEq;

impl<K: PartialEq + ?Sized> KeyEq<K> for NativeEq {
    #[inline]
    fn eq(a: &K, b: &K) -> bool {
        a == b
    }
}
