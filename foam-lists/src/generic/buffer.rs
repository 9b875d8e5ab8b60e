//! A storage block plus the count of live elements at its front.

use crate::error::{ListError, Result};
use crate::generic::storage::Storage;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// Contiguous storage with a logical length and an allocated capacity.
///
/// The first `len` slots are the elements; the rest hold `T::default()` so
/// that growing the length exposes default values and shrinking it drops
/// the removed elements immediately.
pub struct FixedCapacityBuffer<T, S> {
    storage: S,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T, S: Default> Default for FixedCapacityBuffer<T, S> {
    fn default() -> Self {
        Self {
            storage: S::default(),
            len: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: Default, S: Storage<T>> FixedCapacityBuffer<T, S> {
    /// Wraps `storage`, treating its first `len` slots as live.
    pub fn from_storage(storage: S, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());
        Self {
            storage,
            len,
            _marker: PhantomData,
        }
    }

    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] when `capacity` cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::from_storage(S::allocate(capacity)?, 0))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn as_slice(&self) -> &[T] {
        &self.storage.as_slice()[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.storage.as_mut_slice()[..len]
    }

    /// Changes the capacity, truncating the length if it no longer fits.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] when the new size cannot be allocated.
    pub fn reallocate(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.len {
            self.set_len(capacity);
        }
        self.storage.resize(capacity)
    }

    /// Sets the logical length without touching the capacity.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the capacity.
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.capacity(),
            "length {len} exceeds capacity {}",
            self.capacity()
        );
        if len < self.len {
            self.storage.as_mut_slice()[len..self.len].fill_with(T::default);
        }
        self.len = len;
    }

    /// Like [`set_len`](Self::set_len) but newly exposed slots are clones of
    /// `value`.
    pub fn set_len_with(&mut self, len: usize, value: &T)
    where
        T: Clone,
    {
        let old = self.len;
        self.set_len(len);
        if len > old {
            self.storage.as_mut_slice()[old..len].fill(value.clone());
        }
    }

    /// Writes `item` after the last element. The capacity must have room.
    pub fn push_within(&mut self, item: T) {
        let index = self.len;
        self.storage.as_mut_slice()[index] = item;
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(std::mem::take(&mut self.storage.as_mut_slice()[self.len]))
    }

    /// Removes the element at `index`.
    ///
    /// With `fast` the last element takes its place; otherwise the tail is
    /// shifted down by one and the order is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize, fast: bool) -> Result<T> {
        let len = self.len;
        if index >= len {
            return Err(ListError::out_of_range(index, len));
        }
        let live = self.as_mut_slice();
        if fast {
            live.swap(index, len - 1);
        } else {
            live[index..].rotate_left(1);
        }
        self.pop().ok_or(ListError::EmptyContainer)
    }

    /// Clamps `range` to the live elements.
    pub fn validate_range(&self, range: Range<usize>) -> Range<usize> {
        let start = range.start.min(self.len);
        let end = range.end.clamp(start, self.len);
        start..end
    }

    /// Removes the elements in `range` (clamped), preserving the order of the
    /// rest. Returns the number removed.
    pub fn remove_range(&mut self, range: Range<usize>) -> usize {
        let range = self.validate_range(range);
        let count = range.len();
        if count > 0 {
            self.as_mut_slice()[range.start..].rotate_left(count);
            self.set_len(self.len - count);
        }
        count
    }

    /// Keeps only the elements in `range` (clamped). Returns the number kept.
    pub fn subset_range(&mut self, range: Range<usize>) -> usize {
        let range = self.validate_range(range);
        self.as_mut_slice()[..range.end].rotate_left(range.start);
        self.set_len(range.len());
        range.len()
    }

    /// Drops the storage entirely.
    pub fn release(&mut self) {
        self.storage.release();
        self.len = 0;
    }

    /// Consumes the buffer, returning the live elements.
    pub fn into_vec(self) -> Vec<T> {
        let mut items = self.storage.into_vec();
        items.truncate(self.len);
        items
    }
}

impl<T: fmt::Debug + Default, S: Storage<T>> fmt::Debug for FixedCapacityBuffer<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedCapacityBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("items", &self.as_slice())
            .finish()
    }
}
