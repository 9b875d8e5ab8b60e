//! Amortized-growth list with a minimum capacity.
//!
//! [`DynamicList`] keeps slack capacity beyond its length and doubles it when
//! an append does not fit, so a run of `n` appends costs `O(n)` in total.
//! It uses the same storage primitive as [`List`] and can hand its storage to
//! and from one without copying.

use crate::error::{ListError, Result};
use crate::generic::buffer::FixedCapacityBuffer;
use crate::generic::list::List;
use crate::generic::sequence::Sequence;
use crate::generic::storage::{grow_capacity, HeapStorage};
use foam_safe_math::safe_add;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut, Index, IndexMut, Range};
use tracing::debug;

/// Length past which [`DynamicList::append_if_not_in`] logs that its linear
/// scan is being used on a large list.
pub const APPEND_IF_NOT_IN_WARN_LEN: usize = 1024;

/// A heap list that grows geometrically.
///
/// # Type Parameters
///
/// * `T` - The element type. Must implement `Default`; unused slots hold the
///   default value.
/// * `MIN` - Smallest capacity allocated once the list needs storage.
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::dynamic_list::DynamicList;
///
/// let mut list: DynamicList<i32, 4> = DynamicList::new();
/// for value in 0..5 {
///     list.append(value).unwrap();
/// }
/// assert_eq!(list.len(), 5);
/// assert_eq!(list.capacity(), 8);
///
/// assert_eq!(list.remove_at(1, true).unwrap(), 1);
/// assert_eq!(list.as_slice(), &[0, 4, 2, 3]);
/// ```
pub struct DynamicList<T, const MIN: usize = 16> {
    pub(crate) buffer: FixedCapacityBuffer<T, HeapStorage<T>>,
}

impl<T: Default, const MIN: usize> Default for DynamicList<T, MIN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, const MIN: usize> DynamicList<T, MIN> {
    /// Creates an empty list without allocating.
    pub fn new() -> Self {
        Self {
            buffer: FixedCapacityBuffer::default(),
        }
    }

    /// Creates an empty list with room for at least `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut list = Self::new();
        list.reserve(capacity)?;
        Ok(list)
    }

    /// Creates a list of `n` default elements with capacity exactly `n`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be allocated.
    pub fn with_len(n: usize) -> Result<Self> {
        Ok(Self::from(List::with_len(n)?))
    }

    /// Creates a list of `n` clones of `value` with capacity exactly `n`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be allocated.
    pub fn with_value(n: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        Ok(Self::from(List::with_value(n, value)?))
    }

    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from(List::from_slice(items))
    }

    pub fn min_capacity(&self) -> usize {
        MIN
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    /// Address of the first slot, for identity checks after transfers.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.storage().as_ptr()
    }

    /// Ensures the capacity is at least `n`, growing by the doubling rule.
    /// Never shrinks.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the new
    /// capacity cannot be computed or allocated.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        let capacity = self.capacity();
        if n > capacity {
            self.buffer
                .reallocate(grow_capacity(capacity, n, MIN)?)?;
        }
        Ok(())
    }

    /// Sets the capacity to exactly `n`, truncating the list if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be allocated.
    pub fn set_capacity(&mut self, n: usize) -> Result<()> {
        self.buffer.reallocate(n)
    }

    /// Changes the length to `n`.
    ///
    /// Only the length changes when `n` fits in the capacity; otherwise the
    /// storage grows first. Newly exposed elements are default values.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the list
    /// cannot grow.
    pub fn set_size(&mut self, n: usize) -> Result<()> {
        self.reserve(n)?;
        self.buffer.set_len(n);
        Ok(())
    }

    /// Alias for [`set_size`](Self::set_size).
    ///
    /// # Errors
    ///
    /// See [`set_size`](Self::set_size).
    pub fn resize(&mut self, n: usize) -> Result<()> {
        self.set_size(n)
    }

    /// Like [`set_size`](Self::set_size) but newly exposed elements are
    /// clones of `value`.
    ///
    /// # Errors
    ///
    /// See [`set_size`](Self::set_size).
    pub fn set_size_with(&mut self, n: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.reserve(n)?;
        self.buffer.set_len_with(n, &value);
        Ok(())
    }

    /// Appends an element. O(1) amortized.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the list
    /// cannot grow.
    pub fn append(&mut self, item: T) -> Result<()> {
        self.reserve(safe_add(self.len(), 1)?)?;
        self.buffer.push_within(item);
        Ok(())
    }

    /// Appends clones of `items`.
    ///
    /// # Errors
    ///
    /// See [`append`](Self::append).
    pub fn append_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.reserve(safe_add(self.len(), items.len())?)?;
        for item in items {
            self.buffer.push_within(item.clone());
        }
        Ok(())
    }

    /// Moves every element of `other` to the end of this list. `other` is
    /// left with no storage.
    ///
    /// # Errors
    ///
    /// See [`append`](Self::append).
    pub fn append_list<const M: usize>(&mut self, other: &mut DynamicList<T, M>) -> Result<()> {
        self.reserve(safe_add(self.len(), other.len())?)?;
        for item in std::mem::take(&mut other.buffer).into_vec() {
            self.buffer.push_within(item);
        }
        Ok(())
    }

    /// Appends `item` unless an equal element is already present.
    ///
    /// This is a linear scan on every call and is meant for short lists such
    /// as per-face neighbour lists. Returns `true` if the element was added.
    ///
    /// # Errors
    ///
    /// See [`append`](Self::append).
    pub fn append_if_not_in(&mut self, item: T) -> Result<bool>
    where
        T: PartialEq,
    {
        if self.len() > APPEND_IF_NOT_IN_WARN_LEN {
            debug!(len = self.len(), "append_if_not_in scanning a large list");
        }
        if self.as_slice().contains(&item) {
            return Ok(false);
        }
        self.append(item)?;
        Ok(true)
    }

    /// Removes and returns the last element. The capacity is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyContainer`] if the list is empty.
    pub fn remove(&mut self) -> Result<T> {
        self.buffer.pop().ok_or(ListError::EmptyContainer)
    }

    /// Removes the element at `index`.
    ///
    /// With `fast` the last element is moved into the gap (O(1), changes the
    /// order). Without it the following elements shift down (O(len - index),
    /// keeps the order).
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize, fast: bool) -> Result<T> {
        self.buffer.remove_at(index, fast)
    }

    /// Removes the elements in `range`, clamped to the list. Returns the
    /// number removed.
    pub fn remove_range(&mut self, range: Range<usize>) -> usize {
        self.buffer.remove_range(range)
    }

    /// Keeps only the elements in `range`, clamped to the list. Returns the
    /// number kept.
    pub fn subset_range(&mut self, range: Range<usize>) -> usize {
        self.buffer.subset_range(range)
    }

    /// Auto-growing element access: extends the list when `index` is past
    /// the end.
    ///
    /// # Errors
    ///
    /// See [`set_size`](Self::set_size).
    pub fn get_or_grow(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len() {
            self.set_size(safe_add(index, 1)?)?;
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Sets the capacity to exactly `max(len, MIN)`.
    ///
    /// Lists whose capacity is below `MIN`, including an unallocated one,
    /// grow to `MIN`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be reallocated.
    pub fn shrink(&mut self) -> Result<()> {
        let target = self.len().max(MIN);
        if self.capacity() != target {
            self.buffer.reallocate(target)?;
        }
        Ok(())
    }

    /// Sets the length to zero and keeps the capacity.
    pub fn clear(&mut self) {
        self.buffer.set_len(0);
    }

    /// Sets the length to zero and releases the storage.
    pub fn clear_storage(&mut self) {
        self.buffer.release();
    }

    /// Makes the whole capacity addressable. Returns the previous length.
    pub fn expand_storage(&mut self) -> usize {
        let old = self.len();
        let capacity = self.capacity();
        self.buffer.set_len(capacity);
        old
    }

    /// Exchanges contents with `other` in O(1). Each list keeps its own
    /// minimum capacity.
    pub fn swap<const M: usize>(&mut self, other: &mut DynamicList<T, M>) {
        std::mem::swap(&mut self.buffer, &mut other.buffer);
    }

    /// Takes `other`'s storage as-is, without shrinking and ignoring `MIN`.
    /// `other` is left with capacity zero.
    pub fn transfer_from<const M: usize>(&mut self, other: &mut DynamicList<T, M>) {
        self.buffer = std::mem::take(&mut other.buffer);
    }

    /// Takes `other`'s storage; the capacity becomes its length.
    pub fn transfer_from_list(&mut self, other: &mut List<T>) {
        self.buffer = std::mem::take(&mut other.buffer);
    }

    /// Replaces the contents with clones of `items`.
    ///
    /// Copies in place when the capacity suffices, otherwise reallocates to
    /// exactly `items.len()` first.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be allocated.
    pub fn assign_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if items.len() > self.capacity() {
            self.buffer.reallocate(items.len())?;
        }
        self.buffer.set_len(items.len());
        self.as_mut_slice().clone_from_slice(items);
        Ok(())
    }

    /// Converts into a [`List`], dropping the slack capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the storage cannot be reallocated.
    pub fn into_list(mut self) -> Result<List<T>> {
        let len = self.len();
        self.buffer.reallocate(len)?;
        Ok(List {
            buffer: self.buffer,
        })
    }
}

impl<T: Default, const MIN: usize> From<List<T>> for DynamicList<T, MIN> {
    /// Takes the list's storage; the capacity equals its length.
    fn from(list: List<T>) -> Self {
        Self {
            buffer: list.buffer,
        }
    }
}

impl<T: Default, const MIN: usize> From<Vec<T>> for DynamicList<T, MIN> {
    fn from(items: Vec<T>) -> Self {
        Self::from(List::from(items))
    }
}

impl<T: Default, const MIN: usize> Sequence<T> for DynamicList<T, MIN> {
    fn append(&mut self, item: T) -> Result<()> {
        self.append(item)
    }

    fn remove(&mut self) -> Result<T> {
        self.remove()
    }

    fn as_slice(&self) -> &[T] {
        self.as_slice()
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }

    fn len(&self) -> usize {
        self.len()
    }

    fn capacity(&self) -> usize {
        self.capacity()
    }
}

impl<T: Default, const MIN: usize> Deref for DynamicList<T, MIN> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Default, const MIN: usize> DerefMut for DynamicList<T, MIN> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Default, const MIN: usize> Index<usize> for DynamicList<T, MIN> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(item) => item,
            None => panic!("{}", ListError::out_of_range(index, self.len())),
        }
    }
}

impl<T: Default, const MIN: usize> IndexMut<usize> for DynamicList<T, MIN> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(item) => item,
            None => panic!("{}", ListError::out_of_range(index, len)),
        }
    }
}

impl<T: Default, const MIN: usize> FromIterator<T> for DynamicList<T, MIN> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Default, const MIN: usize> Extend<T> for DynamicList<T, MIN> {
    /// # Panics
    ///
    /// Panics if the list cannot grow, as `Vec::extend` does.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            if let Err(err) = self.append(item) {
                panic!("{err}");
            }
        }
    }
}

impl<T: Default, const MIN: usize> IntoIterator for DynamicList<T, MIN> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buffer.into_vec().into_iter()
    }
}

impl<'a, T: Default, const MIN: usize> IntoIterator for &'a DynamicList<T, MIN> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: Default + Clone, const MIN: usize> Clone for DynamicList<T, MIN> {
    /// Deep copy with capacity equal to the length.
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl<T: Default + PartialEq, const MIN: usize, const M: usize> PartialEq<DynamicList<T, M>>
    for DynamicList<T, MIN>
{
    fn eq(&self, other: &DynamicList<T, M>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Default + Eq, const MIN: usize> Eq for DynamicList<T, MIN> {}

impl<T: Default + fmt::Debug, const MIN: usize> fmt::Debug for DynamicList<T, MIN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Default + Serialize, const MIN: usize> Serialize for DynamicList<T, MIN> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, T: Default + Deserialize<'de>, const MIN: usize> Deserialize<'de>
    for DynamicList<T, MIN>
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}
