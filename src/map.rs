//! Separately chained hash map with pooled bucket storage.
//!
//! Buckets live in fixed-size chunks that are allocated on demand and only
//! released all at once (on [`Map::clear`] or drop). A bucket is addressed by
//! a 32-bit [`Link`] into the chunk list, and the same link field threads it
//! either into one slot chain or into the free list.

use alloc::boxed::Box;
use alloc::vec;
use core::fmt;
use core::marker::PhantomData;

use crate::hash::{KeyEq, KeyHash, StrEq, StrHash};
use crate::traits::{exchange, swap};
use crate::vector::Vector;

// =============================================================================
// Configuration
// =============================================================================

const CHUNK_SHIFT: u32 = 6;

/// Buckets per chunk.
pub const CHUNK_SIZE: usize = 1 << CHUNK_SHIFT;

/// Slot count used by [`Map::new`].
pub const DEFAULT_SLOTS: usize = 1024;

// =============================================================================
// Bucket addressing
// =============================================================================

/// Bucket address: `chunk << CHUNK_SHIFT | offset`, or `NULL`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct Link(u32);

impl Link {
    pub(crate) const NULL: Link = Link(u32::MAX);

    #[inline]
    fn new(chunk: usize, offset: usize) -> Self {
        debug_assert!(offset < CHUNK_SIZE);
        let idx = chunk
            .checked_mul(CHUNK_SIZE)
            .and_then(|base| base.checked_add(offset))
            .filter(|&idx| idx < u32::MAX as usize);
        match idx {
            Some(idx) => Self(idx as u32),
            None => panic!("Map bucket address space exhausted"),
        }
    }

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    pub(crate) fn chunk(self) -> usize {
        debug_assert!(!self.is_null());
        (self.0 >> CHUNK_SHIFT) as usize
    }

    #[inline]
    pub(crate) fn offset(self) -> usize {
        debug_assert!(!self.is_null());
        self.0 as usize & (CHUNK_SIZE - 1)
    }
}

pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
}

pub(crate) struct Bucket<K, V> {
    /// `None` while the bucket sits on the free list.
    pub(crate) entry: Option<Entry<K, V>>,
    pub(crate) next: Link,
}

// =============================================================================
// Map
// =============================================================================

/// Hash map with a fixed number of slots, chained buckets and pooled storage.
///
/// `H` and `E` are stateless strategies (see [`KeyHash`] and [`KeyEq`]). The
/// slot count is chosen at construction and never changes, so chains grow
/// with the number of entries per slot. Iteration order is unspecified.
pub struct Map<K, V, H, E> {
    /// Head of each slot's chain.
    pub(crate) slots: Box<[Link]>,
    len: usize,
    /// Head of the free list.
    pub(crate) unused: Link,
    pub(crate) chunks: Vector<Box<[Bucket<K, V>]>>,
    _strategy: PhantomData<fn() -> (H, E)>,
}

/// Map keyed by text, hashed with native-width FNV-1a.
pub type StrMap<K, V> = Map<K, V, StrHash, StrEq>;

impl<K, V, H, E> Map<K, V, H, E> {
    /// Creates a map with [`DEFAULT_SLOTS`] slots.
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOTS)
    }

    /// Creates a map with `slots` slots. No bucket chunk is allocated yet.
    ///
    /// # Panics
    /// Panics if `slots == 0`.
    pub fn with_slots(slots: usize) -> Self {
        assert!(slots > 0, "Map needs at least one slot");
        Self {
            slots: vec![Link::NULL; slots].into_boxed_slice(),
            len: 0,
            unused: Link::NULL,
            chunks: Vector::new(),
            _strategy: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of bucket chunks currently allocated.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drops every entry and releases every chunk.
    ///
    /// Chunks are freed rather than recycled; the next insertion allocates a
    /// fresh one.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        self.len = 0;
        self.unused = Link::NULL;
        self.slots.fill(Link::NULL);
        drop(exchange(&mut self.chunks, Vector::new()));
    }

    /// Calls `f` once per entry, in slot order then chain order.
    pub fn for_each<F: FnMut(&K, &V)>(&self, mut f: F) {
        for &head in self.slots.iter() {
            let mut link = head;
            while !link.is_null() {
                let bucket = self.bucket(link);
                if let Some(entry) = &bucket.entry {
                    f(&entry.key, &entry.value);
                }
                link = bucket.next;
            }
        }
    }

    /// Like [`for_each`](Self::for_each) with mutable access to values.
    pub fn for_each_mut<F: FnMut(&K, &mut V)>(&mut self, mut f: F) {
        for slot in 0..self.slots.len() {
            let mut link = self.slots[slot];
            while !link.is_null() {
                let bucket = &mut self.chunks[link.chunk()][link.offset()];
                if let Some(entry) = &mut bucket.entry {
                    f(&entry.key, &mut entry.value);
                }
                link = bucket.next;
            }
        }
    }

    pub fn swap_with(&mut self, other: &mut Self) {
        swap(&mut self.slots, &mut other.slots);
        swap(&mut self.len, &mut other.len);
        swap(&mut self.unused, &mut other.unused);
        swap(&mut self.chunks, &mut other.chunks);
    }

    #[inline]
    fn bucket(&self, link: Link) -> &Bucket<K, V> {
        &self.chunks[link.chunk()][link.offset()]
    }

    fn entry(&self, link: Link) -> &Entry<K, V> {
        match &self.bucket(link).entry {
            Some(entry) => entry,
            None => unreachable!("chained bucket without entry"),
        }
    }

    fn entry_mut(&mut self, link: Link) -> &mut Entry<K, V> {
        match &mut self.chunks[link.chunk()][link.offset()].entry {
            Some(entry) => entry,
            None => unreachable!("chained bucket without entry"),
        }
    }

    /// Takes a bucket off the free list, fills it and links it at the head of
    /// `slot`'s chain.
    fn add(&mut self, slot: usize, entry: Entry<K, V>) -> Link {
        if self.unused.is_null() {
            self.grow();
        }
        let link = self.unused;
        let head = self.slots[slot];
        let bucket = &mut self.chunks[link.chunk()][link.offset()];
        debug_assert!(bucket.entry.is_none());
        self.unused = bucket.next;
        bucket.next = head;
        bucket.entry = Some(entry);
        self.slots[slot] = link;
        self.len += 1;
        link
    }

    /// Allocates a chunk and pushes all of its buckets onto the free list.
    #[cold]
    fn grow(&mut self) {
        let chunk = self.chunks.len();
        let tail = self.unused;
        let buckets: Box<[Bucket<K, V>]> = (0..CHUNK_SIZE)
            .map(|offset| Bucket {
                entry: None,
                next: if offset + 1 < CHUNK_SIZE {
                    Link::new(chunk, offset + 1)
                } else {
                    tail
                },
            })
            .collect();
        self.chunks.push(buckets);
        self.unused = Link::new(chunk, 0);
    }
}

impl<K, V, H: KeyHash<K>, E: KeyEq<K>> Map<K, V, H, E> {
    /// Returns the value for `key`, inserting `V::default()` if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (slot, mut link) = self.locate(&key);
        if link.is_null() {
            link = self.add(
                slot,
                Entry {
                    key,
                    value: V::default(),
                },
            );
        }
        &mut self.entry_mut(link).value
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns the stored value either way. On a hit the existing entry is
    /// left untouched and `key` and `value` are dropped.
    pub fn insert(&mut self, key: K, value: V) -> &mut V {
        let (slot, mut link) = self.locate(&key);
        if link.is_null() {
            link = self.add(slot, Entry { key, value });
        }
        &mut self.entry_mut(link).value
    }

    pub fn find(&self, key: &K) -> Option<&V> {
        let (_, link) = self.locate(key);
        if link.is_null() {
            return None;
        }
        Some(&self.entry(link).value)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let (_, link) = self.locate(key);
        if link.is_null() {
            return None;
        }
        Some(&mut self.entry_mut(link).value)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        !self.locate(key).1.is_null()
    }

    /// Slot index of `key` and the bucket holding it (`NULL` if absent).
    fn locate(&self, key: &K) -> (usize, Link) {
        let slot = H::hash(key) % self.slots.len();
        let mut link = self.slots[slot];
        while !link.is_null() {
            let bucket = self.bucket(link);
            if let Some(entry) = &bucket.entry {
                if E::eq(key, &entry.key) {
                    return (slot, link);
                }
            }
            link = bucket.next;
        }
        (slot, Link::NULL)
    }
}

impl<K, V, H, E> Default for Map<K, V, H, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H, E> fmt::Debug for Map<K, V, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        self.for_each(|k, v| {
            map.entry(k, v);
        });
        map.finish()
    }
}
