//! Contiguous growable array with explicit capacity control.

use alloc::alloc::{alloc, dealloc, realloc, Layout};
use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::slice;

use crate::error::TryReserveError;
use crate::traits::{max, swap};

// =============================================================================
// Configuration
// =============================================================================

/// Smallest capacity ever allocated.
pub const MIN_SIZE: usize = 4;

/// A growable array that owns one heap buffer.
///
/// Elements in `[0, len)` are initialized, `[len, cap)` is allocated but
/// uninitialized. `cap == 0` means no buffer is allocated. Zero-sized element
/// types never allocate and report `usize::MAX` as their capacity.
///
/// Unlike `std::vec::Vec::reserve`, [`reserve`](Self::reserve) takes the total
/// capacity wanted, not the number of additional elements.
pub struct Vector<T> {
    buf: NonNull<T>,
    len: usize,
    cap: usize,
    _marker: PhantomData<T>,
}

// SAFETY: `Vector<T>` owns its elements exactly like `Box<[T]>`.
unsafe impl<T: Send> Send for Vector<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for Vector<T> {}

impl<T> Vector<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    pub const fn new() -> Self {
        Self {
            buf: NonNull::dangling(),
            len: 0,
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            _marker: PhantomData,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        let mut v = Self::new();
        v.reserve(cap);
        v
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
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Ensures `capacity() >= cap`.
    ///
    /// When the buffer has to grow it is reallocated to exactly
    /// `max(cap, MIN_SIZE)` slots and the live elements are moved over in
    /// index order.
    ///
    /// # Panics
    /// Panics on capacity overflow; allocator failure aborts through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error).
    pub fn reserve(&mut self, cap: usize) {
        if let Err(e) = self.try_reserve(cap) {
            e.handle();
        }
    }

    /// Fallible [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, cap: usize) -> Result<(), TryReserveError> {
        if cap <= self.cap {
            return Ok(());
        }
        self.grow_to(max(cap, MIN_SIZE))
    }

    /// Appends `value` to the end.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.emplace(value);
    }

    /// Appends `value` and returns a reference to it in place.
    pub fn emplace(&mut self, value: T) -> &mut T {
        if self.len == self.cap {
            self.grow_one();
        }
        // SAFETY: `len < cap`, so the slot is allocated and uninitialized.
        unsafe {
            let slot = self.buf.as_ptr().add(self.len);
            slot.write(value);
            self.len += 1;
            &mut *slot
        }
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was initialized and is now
        // outside the live range, so reading it out transfers ownership.
        Some(unsafe { self.buf.as_ptr().add(self.len).read() })
    }

    /// Shrinks the live range to `len` elements, dropping the tail.
    ///
    /// Capacity is unchanged.
    ///
    /// # Panics
    /// Panics if `len > self.len()`: elements are only ever created by
    /// [`push`](Self::push) or [`emplace`](Self::emplace).
    pub fn resize(&mut self, len: usize) {
        assert!(
            len <= self.len,
            "Vector::resize cannot grow ({len} > {})",
            self.len
        );
        let old_len = self.len;
        // Shorten first so a panicking destructor cannot cause a double drop.
        self.len = len;
        // SAFETY: `[len, old_len)` was initialized and is no longer reachable.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.buf.as_ptr().add(len), old_len - len);
            ptr::drop_in_place(tail);
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.resize(0);
    }

    /// # Panics
    /// Panics if the vector is empty.
    pub fn front(&self) -> &T {
        match self.as_slice().first() {
            Some(v) => v,
            None => panic!("Vector::front on empty vector"),
        }
    }

    /// # Panics
    /// Panics if the vector is empty.
    pub fn front_mut(&mut self) -> &mut T {
        match self.as_mut_slice().first_mut() {
            Some(v) => v,
            None => panic!("Vector::front_mut on empty vector"),
        }
    }

    /// # Panics
    /// Panics if the vector is empty.
    pub fn back(&self) -> &T {
        match self.as_slice().last() {
            Some(v) => v,
            None => panic!("Vector::back on empty vector"),
        }
    }

    /// # Panics
    /// Panics if the vector is empty.
    pub fn back_mut(&mut self) -> &mut T {
        match self.as_mut_slice().last_mut() {
            Some(v) => v,
            None => panic!("Vector::back_mut on empty vector"),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `buf` is non-null and aligned, `[0, len)` is initialized.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// Exchanges buffers, lengths and capacities with `other`.
    pub fn swap_with(&mut self, other: &mut Self) {
        swap(&mut self.buf, &mut other.buf);
        swap(&mut self.len, &mut other.len);
        swap(&mut self.cap, &mut other.cap);
    }

    #[cold]
    fn grow_one(&mut self) {
        // Round up so that a run of pushes costs amortized O(1).
        let target = match self
            .len
            .checked_add(1)
            .and_then(usize::checked_next_power_of_two)
        {
            Some(n) => max(n, MIN_SIZE),
            None => TryReserveError::CapacityOverflow.handle(),
        };
        if let Err(e) = self.grow_to(target) {
            e.handle();
        }
    }

    fn grow_to(&mut self, new_cap: usize) -> Result<(), TryReserveError> {
        debug_assert!(new_cap > self.cap);
        if Self::IS_ZST {
            // Capacity is already `usize::MAX`.
            return Err(TryReserveError::CapacityOverflow);
        }

        let new_layout =
            Layout::array::<T>(new_cap).map_err(|_| TryReserveError::CapacityOverflow)?;
        let raw = if self.cap == 0 {
            // SAFETY: `T` is not zero-sized and `new_cap >= MIN_SIZE`.
            unsafe { alloc(new_layout) }
        } else {
            let old_layout = self.current_layout();
            // SAFETY: `buf` was allocated with `old_layout`, the new size is
            // non-zero and fits `isize::MAX` (checked by `Layout::array`).
            // `realloc` moves the live prefix bytewise, which is a Rust move.
            unsafe { realloc(self.buf.as_ptr().cast(), old_layout, new_layout.size()) }
        };
        let buf = NonNull::new(raw.cast::<T>()).ok_or(TryReserveError::AllocError {
            layout: new_layout,
        })?;

        self.buf = buf;
        self.cap = new_cap;
        debug_assert!(self.len <= self.cap);
        Ok(())
    }

    fn current_layout(&self) -> Layout {
        // SAFETY: this exact layout was successfully built in `grow_to`.
        unsafe {
            Layout::from_size_align_unchecked(mem::size_of::<T>() * self.cap, mem::align_of::<T>())
        }
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` is initialized and dropped exactly once here.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
        if !Self::IS_ZST && self.cap != 0 {
            // SAFETY: `buf` was allocated by `grow_to` with this layout.
            unsafe { dealloc(self.buf.as_ptr().cast(), self.current_layout()) };
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        let mut v = Self::new();
        v.clone_from(self);
        v
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if source.len() > self.capacity() {
            self.reserve(source.len());
        }
        for value in source.iter() {
            self.push(value.clone());
        }
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for Vector<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}
