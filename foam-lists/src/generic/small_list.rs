//! Small-buffer-optimized list.
//!
//! [`SmallInlineList`] stores up to `N` elements inside the value itself and
//! only touches the heap once it grows past that. Mesh adjacency lists (the
//! faces of a cell, the points of a face) are almost always short, so this
//! avoids an allocation per list in the common case.

use crate::error::{ListError, Result};
use crate::generic::buffer::FixedCapacityBuffer;
use crate::generic::sequence::Sequence;
use crate::generic::storage::{grow_capacity_small, SpillStorage};
use foam_safe_math::safe_add;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut, Index, IndexMut, Range};

/// A list with `N` inline slots that spills to the heap when it outgrows
/// them.
///
/// Once spilled the list stays on the heap, even if elements are removed,
/// until [`shrink`](Self::shrink) or [`clear_storage`](Self::clear_storage)
/// moves it back inline.
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::small_list::SmallInlineList;
///
/// let mut list: SmallInlineList<u32, 4> = SmallInlineList::new();
/// for value in 0..4 {
///     list.append(value).unwrap();
/// }
/// assert!(list.is_inline());
///
/// list.append(4).unwrap();
/// assert!(!list.is_inline());
///
/// list.remove().unwrap();
/// assert!(!list.is_inline());
///
/// list.shrink().unwrap();
/// assert!(list.is_inline());
/// ```
pub struct SmallInlineList<T, const N: usize> {
    buffer: FixedCapacityBuffer<T, SpillStorage<T, N>>,
}

impl<T: Default, const N: usize> Default for SmallInlineList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default, const N: usize> SmallInlineList<T, N> {
    /// Creates an empty list using only inline storage.
    pub fn new() -> Self {
        Self {
            buffer: FixedCapacityBuffer::default(),
        }
    }

    /// Creates a list of `n` default elements.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n > N` and the heap storage
    /// cannot be allocated.
    pub fn with_len(n: usize) -> Result<Self> {
        let mut list = Self::new();
        list.set_size(n)?;
        Ok(list)
    }

    /// Creates a list of `n` clones of `value`.
    ///
    /// # Errors
    ///
    /// See [`with_len`](Self::with_len).
    pub fn with_value(n: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let mut list = Self::new();
        list.set_size_with(n, value)?;
        Ok(list)
    }

    /// # Errors
    ///
    /// See [`with_len`](Self::with_len).
    pub fn from_slice(items: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        let mut list = Self::new();
        list.reserve(items.len())?;
        for item in items {
            list.buffer.push_within(item.clone());
        }
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// `N` while inline, the heap allocation size otherwise.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// `true` while the elements live in the inline slots.
    pub fn is_inline(&self) -> bool {
        self.buffer.storage().is_inline()
    }

    /// Size in bytes of the live elements.
    pub fn byte_size(&self) -> usize {
        std::mem::size_of_val(self.as_slice())
    }

    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    /// Ensures room for `n` elements, spilling to the heap if `n > N`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the list
    /// cannot grow.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        let capacity = self.capacity();
        if n > capacity {
            self.buffer.reallocate(grow_capacity_small(capacity, n)?)?;
        }
        Ok(())
    }

    /// Changes the length to `n`, growing the storage if needed. The storage
    /// is never shrunk here.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn set_size(&mut self, n: usize) -> Result<()> {
        self.reserve(n)?;
        self.buffer.set_len(n);
        Ok(())
    }

    /// Like [`set_size`](Self::set_size) with new elements cloned from
    /// `value`.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn set_size_with(&mut self, n: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.reserve(n)?;
        self.buffer.set_len_with(n, &value);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn append(&mut self, item: T) -> Result<()> {
        self.reserve(safe_add(self.len(), 1)?)?;
        self.buffer.push_within(item);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
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

    /// Appends `item` unless an equal element is already present. Returns
    /// `true` if it was added.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn append_if_not_in(&mut self, item: T) -> Result<bool>
    where
        T: PartialEq,
    {
        if self.as_slice().contains(&item) {
            return Ok(false);
        }
        self.append(item)?;
        Ok(true)
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyContainer`] if the list is empty.
    pub fn remove(&mut self) -> Result<T> {
        self.buffer.pop().ok_or(ListError::EmptyContainer)
    }

    /// Removes the element at `index`, either swapping in the last element
    /// (`fast`) or shifting the tail down.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize, fast: bool) -> Result<T> {
        self.buffer.remove_at(index, fast)
    }

    /// Removes the elements in `range`, clamped. Returns the number removed.
    pub fn remove_range(&mut self, range: Range<usize>) -> usize {
        self.buffer.remove_range(range)
    }

    /// Keeps only the elements in `range`, clamped. Returns the number kept.
    pub fn subset_range(&mut self, range: Range<usize>) -> usize {
        self.buffer.subset_range(range)
    }

    /// Auto-growing element access.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn get_or_grow(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len() {
            self.set_size(safe_add(index, 1)?)?;
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Fits the storage to the length, moving back inline when it fits.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the heap storage cannot be
    /// reallocated.
    pub fn shrink(&mut self) -> Result<()> {
        let len = self.len();
        self.buffer.reallocate(len)
    }

    /// Sets the length to zero, keeping the current storage.
    pub fn clear(&mut self) {
        self.buffer.set_len(0);
    }

    /// Sets the length to zero and returns to inline storage.
    pub fn clear_storage(&mut self) {
        self.buffer.release();
    }

    /// Takes `other`'s contents, leaving it empty and inline.
    pub fn transfer_from(&mut self, other: &mut SmallInlineList<T, N>) {
        self.buffer = std::mem::take(&mut other.buffer);
    }
}

impl<T: Default, const N: usize> Sequence<T> for SmallInlineList<T, N> {
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

impl<T: Default, const N: usize> Deref for SmallInlineList<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Default, const N: usize> DerefMut for SmallInlineList<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Default, const N: usize> Index<usize> for SmallInlineList<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(item) => item,
            None => panic!("{}", ListError::out_of_range(index, self.len())),
        }
    }
}

impl<T: Default, const N: usize> IndexMut<usize> for SmallInlineList<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(item) => item,
            None => panic!("{}", ListError::out_of_range(index, len)),
        }
    }
}

impl<T: Default, const N: usize> From<Vec<T>> for SmallInlineList<T, N> {
    fn from(items: Vec<T>) -> Self {
        let len = items.len();
        let storage = if len <= N {
            let mut inline = SpillStorage::default();
            if let SpillStorage::Inline(slots) = &mut inline {
                for (slot, item) in slots.iter_mut().zip(items) {
                    *slot = item;
                }
            }
            inline
        } else {
            SpillStorage::Heap(items.into())
        };
        Self {
            buffer: FixedCapacityBuffer::from_storage(storage, len),
        }
    }
}

impl<T: Default, const N: usize> FromIterator<T> for SmallInlineList<T, N> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Default, const N: usize> Extend<T> for SmallInlineList<T, N> {
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

impl<T: Default, const N: usize> IntoIterator for SmallInlineList<T, N> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buffer.into_vec().into_iter()
    }
}

impl<'a, T: Default, const N: usize> IntoIterator for &'a SmallInlineList<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: Default + Clone, const N: usize> Clone for SmallInlineList<T, N> {
    fn clone(&self) -> Self {
        Self::from(self.as_slice().to_vec())
    }
}

impl<T: Default + PartialEq, const N: usize> PartialEq for SmallInlineList<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Default + Eq, const N: usize> Eq for SmallInlineList<T, N> {}

impl<T: Default + fmt::Debug, const N: usize> fmt::Debug for SmallInlineList<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Default + Serialize, const N: usize> Serialize for SmallInlineList<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, T: Default + Deserialize<'de>, const N: usize> Deserialize<'de>
    for SmallInlineList<T, N>
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_inline() {
        let list = SmallInlineList::<u32, 3>::new();
        assert!(list.is_inline());
        assert_eq!(list.capacity(), 3);
        assert!(list.is_empty());
    }

    #[test]
    fn test_spill_keeps_contents() {
        let mut list = SmallInlineList::<u32, 2>::new();
        list.append(1).unwrap();
        list.append(2).unwrap();
        assert!(list.is_inline());

        list.append(3).unwrap();
        assert!(!list.is_inline());
        assert_eq!(list.capacity(), 6);
        assert_eq!(list.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_stays_on_heap_until_shrink() {
        let mut list = SmallInlineList::<u32, 2>::from(vec![1, 2, 3]);
        assert!(!list.is_inline());
        list.remove().unwrap();
        list.remove().unwrap();
        assert!(!list.is_inline());

        list.shrink().unwrap();
        assert!(list.is_inline());
        assert_eq!(list.as_slice(), &[1]);
        assert_eq!(list.capacity(), 2);
    }

    #[test]
    fn test_shrink_on_heap_fits_length() {
        let mut list = SmallInlineList::<u32, 2>::new();
        for value in 0..7 {
            list.append(value).unwrap();
        }
        assert_eq!(list.capacity(), 14);
        list.shrink().unwrap();
        assert_eq!(list.capacity(), 7);
        assert!(!list.is_inline());
    }

    #[test]
    fn test_remove_policies() {
        let mut list = SmallInlineList::<i32, 8>::from(vec![0, 1, 2, 3, 4]);
        assert_eq!(list.remove_at(1, true).unwrap(), 1);
        assert_eq!(list.as_slice(), &[0, 4, 2, 3]);
        assert_eq!(list.remove_at(0, false).unwrap(), 0);
        assert_eq!(list.as_slice(), &[4, 2, 3]);
        assert_eq!(list.remove_range(1..2), 1);
        assert_eq!(list.as_slice(), &[4, 3]);

        let mut empty = SmallInlineList::<i32, 8>::new();
        assert_eq!(empty.remove().unwrap_err(), ListError::EmptyContainer);
    }

    #[test]
    fn test_set_size_and_fill() {
        let mut list = SmallInlineList::<i32, 4>::with_value(2, 7).unwrap();
        list.set_size(3).unwrap();
        assert_eq!(list.as_slice(), &[7, 7, 0]);
        list.set_size_with(6, 1).unwrap();
        assert!(!list.is_inline());
        assert_eq!(list.as_slice(), &[7, 7, 0, 1, 1, 1]);
        list.set_size(1).unwrap();
        assert!(!list.is_inline());
    }

    #[test]
    fn test_append_slice_and_extend() {
        let mut list = SmallInlineList::<u16, 3>::new();
        list.append_slice(&[1, 2]).unwrap();
        assert!(list.is_inline());
        list.extend([3, 4]);
        assert!(!list.is_inline());
        assert_eq!(list.first(), Some(&1));
        assert_eq!(list.last(), Some(&4));
        assert_eq!(list.subset_range(1..3), 2);
        assert_eq!(list.as_slice(), &[2, 3]);
    }

    #[test]
    fn test_sequence_surface() {
        let list = SmallInlineList::<char, 4>::from(vec!['a', 'b', 'c']);
        assert_eq!(list.find(&'b'), Some(1));
        assert!(!list.found(&'z'));
        assert_eq!(*list.fc_value(2).unwrap(), 'a');
        assert_eq!(
            list.at(3).unwrap_err(),
            ListError::IndexOutOfRange { index: 3, len: 3 }
        );
    }

    #[test]
    #[should_panic(expected = "Index 4 out of range [0, 2)")]
    fn test_index_panics_with_range() {
        let list = SmallInlineList::<u8, 4>::from(vec![1, 2]);
        let _value = list[4];
    }

    #[test]
    fn test_append_if_not_in() {
        let mut list = SmallInlineList::<u8, 4>::new();
        assert!(list.append_if_not_in(3).unwrap());
        assert!(!list.append_if_not_in(3).unwrap());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_get_or_grow_and_byte_size() {
        let mut list = SmallInlineList::<u32, 4>::new();
        *list.get_or_grow(5).unwrap() = 9;
        assert_eq!(list.len(), 6);
        assert_eq!(list[5], 9);
        assert_eq!(list.byte_size(), 6 * 4);
    }

    #[test]
    fn test_clear_storage_returns_inline() {
        let mut list = SmallInlineList::<u32, 1>::from(vec![1, 2, 3]);
        list.clear();
        assert!(!list.is_inline());
        list.clear_storage();
        assert!(list.is_inline());
        assert!(list.is_empty());
    }

    #[test]
    fn test_transfer_and_equality() {
        let mut source = SmallInlineList::<u32, 2>::from(vec![5, 6, 7]);
        let mut target = SmallInlineList::<u32, 2>::new();
        target.transfer_from(&mut source);
        assert_eq!(target, SmallInlineList::from(vec![5, 6, 7]));
        assert!(source.is_empty());
        assert!(source.is_inline());
    }

    #[test]
    fn test_from_slice_and_clone() {
        let list = SmallInlineList::<String, 2>::from_slice(&["a".into(), "b".into()]).unwrap();
        assert!(list.is_inline());
        let copy = list.clone();
        assert_eq!(copy, list);
    }
}
