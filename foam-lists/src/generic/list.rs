//! Dense list whose capacity always equals its length.
//!
//! [`List`] is the plain owning sequence of the family. Every size change
//! reallocates to the exact new length, so it never carries slack. Use
//! [`DynamicList`](crate::generic::dynamic_list::DynamicList) when building a
//! list element by element.

use crate::error::{ListError, Result};
use crate::generic::buffer::FixedCapacityBuffer;
use crate::generic::sequence::Sequence;
use crate::generic::storage::{size_from_label, HeapStorage, Label, Storage};
use foam_safe_math::{safe_add, safe_mul};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// A heap-allocated sequence sized exactly to its length.
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::list::List;
///
/// let mut list: List<i32> = List::with_len(3).unwrap();
/// list[0] = 7;
///
/// list.set_size(5).unwrap();
/// assert_eq!(list.as_slice(), &[7, 0, 0, 0, 0]);
///
/// list.set_size(2).unwrap();
/// assert_eq!(list.as_slice(), &[7, 0]);
/// assert_eq!(list.capacity(), 2);
/// ```
pub struct List<T> {
    pub(crate) buffer: FixedCapacityBuffer<T, HeapStorage<T>>,
}

impl<T: Default> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> List<T> {
    /// Creates an empty list with no allocation.
    pub fn new() -> Self {
        Self {
            buffer: FixedCapacityBuffer::default(),
        }
    }

    /// Creates a list of `n` default elements from a signed size.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n` is negative or too large.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foam_lists::generic::list::List;
    ///
    /// assert_eq!(List::<u8>::create(2).unwrap().len(), 2);
    /// assert!(List::<u8>::create(-1).is_err());
    /// ```
    pub fn create(n: Label) -> Result<Self> {
        Self::with_len(size_from_label(n)?)
    }

    /// Creates a list of `n` default elements.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n` elements cannot be allocated.
    pub fn with_len(n: usize) -> Result<Self> {
        let storage = HeapStorage::allocate(n)?;
        Ok(Self {
            buffer: FixedCapacityBuffer::from_storage(storage, n),
        })
    }

    /// Creates a list of `n` clones of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n` elements cannot be allocated.
    pub fn with_value(n: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let mut list = Self::with_len(n)?;
        list.fill(value);
        Ok(list)
    }

    /// Creates a list holding clones of `items`.
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from(items.to_vec())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Always equal to [`len`](Self::len).
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }

    /// Reallocates to exactly `n` elements.
    ///
    /// The first `min(n, len)` elements are kept and new ones are default
    /// values. This copies the whole list every time the size changes.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n` elements cannot be allocated.
    pub fn set_size(&mut self, n: usize) -> Result<()> {
        self.buffer.reallocate(n)?;
        self.buffer.set_len(n);
        Ok(())
    }

    /// Alias for [`set_size`](Self::set_size).
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n` elements cannot be allocated.
    pub fn resize(&mut self, n: usize) -> Result<()> {
        self.set_size(n)
    }

    /// Reallocates to exactly `n` elements, filling new ones with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if `n` elements cannot be allocated.
    pub fn set_size_with(&mut self, n: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        let old = self.len();
        self.set_size(n)?;
        if n > old {
            self.as_mut_slice()[old..].fill(value);
        }
        Ok(())
    }

    /// Appends one element by reallocating to `len + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the list
    /// cannot grow.
    pub fn append(&mut self, item: T) -> Result<()> {
        let index = self.len();
        self.set_size(safe_add(index, 1)?)?;
        self.as_mut_slice()[index] = item;
        Ok(())
    }

    /// Appends clones of `items`.
    ///
    /// Appending a list to itself cannot be expressed: `items` would borrow
    /// the list that is being mutated.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the list cannot grow.
    pub fn append_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        let start = self.len();
        self.set_size(safe_add(start, items.len())?)?;
        self.as_mut_slice()[start..].clone_from_slice(items);
        Ok(())
    }

    /// Moves every element of `other` to the end of this list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the list cannot grow.
    pub fn append_list(&mut self, other: List<T>) -> Result<()> {
        let start = self.len();
        self.set_size(safe_add(start, other.len())?)?;
        for (slot, item) in self.as_mut_slice()[start..].iter_mut().zip(other) {
            *slot = item;
        }
        Ok(())
    }

    /// Mutable access to element `index`, doubling the size first when the
    /// index is past the end.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the list cannot grow.
    pub fn new_elmt(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        if index >= len {
            self.set_size(safe_mul(len, 2)?.max(safe_add(index, 1)?))?;
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// Takes ownership of `other`'s storage. No element is copied and `other`
    /// is left empty with no allocation.
    pub fn transfer_from(&mut self, other: &mut List<T>) {
        self.buffer = std::mem::take(&mut other.buffer);
    }

    /// Drops every element and the storage.
    pub fn clear(&mut self) {
        self.buffer.release();
    }

    /// Address of the first element, for identity checks after transfers.
    pub fn as_ptr(&self) -> *const T {
        self.buffer.storage().as_ptr()
    }
}

impl<T: Default> Sequence<T> for List<T> {
    fn append(&mut self, item: T) -> Result<()> {
        self.append(item)
    }

    fn remove(&mut self) -> Result<T> {
        let last = self.buffer.pop().ok_or(ListError::EmptyContainer)?;
        let len = self.len();
        self.buffer.reallocate(len)?;
        Ok(last)
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

impl<T: Default> Deref for List<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Default> DerefMut for List<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Default> Index<usize> for List<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.as_slice().get(index) {
            Some(item) => item,
            None => panic!("{}", ListError::out_of_range(index, self.len())),
        }
    }
}

impl<T: Default> IndexMut<usize> for List<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(item) => item,
            None => panic!("{}", ListError::out_of_range(index, len)),
        }
    }
}

impl<T> From<Vec<T>> for List<T>
where
    T: Default,
{
    fn from(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            buffer: FixedCapacityBuffer::from_storage(HeapStorage::from(items), len),
        }
    }
}

impl<T: Default> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Default> Extend<T> for List<T> {
    /// Reallocates once for the whole batch.
    ///
    /// # Panics
    ///
    /// Panics if the list cannot grow, as `Vec::extend` does.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let items: Vec<T> = iter.into_iter().collect();
        if items.is_empty() {
            return;
        }
        let start = self.len();
        if let Err(err) = safe_add(start, items.len())
            .map_err(ListError::from)
            .and_then(|len| self.set_size(len))
        {
            panic!("{err}");
        }
        for (slot, item) in self.as_mut_slice()[start..].iter_mut().zip(items) {
            *slot = item;
        }
    }
}

impl<T: Default> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buffer.into_vec().into_iter()
    }
}

impl<'a, T: Default> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T: Default + Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl<T: Default + PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Default + Eq> Eq for List<T> {}

impl<T: Default + fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Default + Serialize> Serialize for List<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, T: Default + Deserialize<'de>> Deserialize<'de> for List<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foam_safe_math::MathError;

    #[test]
    fn test_default_is_empty() {
        let list = List::<u32>::default();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.capacity(), 0);
    }

    #[test]
    fn test_create_rejects_negative() {
        assert_eq!(
            List::<u32>::create(-5).unwrap_err(),
            ListError::Allocation { requested: -5 }
        );
        let list = List::<u32>::create(3).unwrap();
        assert_eq!(list.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn test_create_overflow() {
        assert!(matches!(
            List::<u64>::with_len(usize::MAX),
            Err(ListError::Allocation { .. })
        ));
    }

    #[test]
    fn test_set_size_grow_then_shrink() {
        let mut list = List::from(vec![10, 20, 30]);
        list.set_size(5).unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list.capacity(), 5);
        assert_eq!(list.as_slice(), &[10, 20, 30, 0, 0]);

        list.set_size(2).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.capacity(), 2);
        assert_eq!(list.as_slice(), &[10, 20]);
    }

    #[test]
    fn test_set_size_with_fill() {
        let mut list = List::from(vec![1]);
        list.set_size_with(4, 9).unwrap();
        assert_eq!(list.as_slice(), &[1, 9, 9, 9]);
        list.set_size_with(2, 5).unwrap();
        assert_eq!(list.as_slice(), &[1, 9]);
    }

    #[test]
    fn test_append_reallocates_exactly() {
        let mut list = List::new();
        for value in 0..4 {
            list.append(value).unwrap();
            assert_eq!(list.capacity(), list.len());
            assert_eq!(list[value as usize], value);
        }
        assert_eq!(list.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_append_slice_and_list() {
        let mut list = List::from(vec![1, 2]);
        list.append_slice(&[3, 4]).unwrap();
        list.append_list(List::from(vec![5])).unwrap();
        assert_eq!(list.as_slice(), &[1, 2, 3, 4, 5]);

        list.extend(vec![6, 7]);
        assert_eq!(list.len(), 7);
        assert_eq!(list.capacity(), 7);
        assert_eq!(list.last(), Some(&7));
    }

    #[test]
    fn test_growth_overflow_is_reported() {
        let mut list = List::from(vec![0u8]);
        assert_eq!(
            list.new_elmt(usize::MAX).unwrap_err(),
            ListError::Math(MathError::AdditionOverflow)
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_new_elmt_doubles() {
        let mut list = List::from(vec![1, 2, 3]);
        *list.new_elmt(4).unwrap() = 7;
        assert_eq!(list.len(), 6);
        assert_eq!(list.as_slice(), &[1, 2, 3, 0, 7, 0]);

        let mut empty = List::<u8>::new();
        *empty.new_elmt(0).unwrap() = 1;
        assert_eq!(empty.as_slice(), &[1]);
    }

    #[test]
    fn test_transfer_moves_storage() {
        let mut source = List::from(vec![1, 2, 3]);
        let ptr = source.as_ptr();
        let mut target = List::from(vec![9]);

        target.transfer_from(&mut source);
        assert_eq!(target.as_slice(), &[1, 2, 3]);
        assert_eq!(target.as_ptr(), ptr);
        assert!(source.is_empty());
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn test_equality() {
        assert_eq!(List::from(vec![1, 2]), List::from(vec![1, 2]));
        assert_ne!(List::from(vec![1, 2]), List::from(vec![2, 1]));
        assert_ne!(List::from(vec![1, 2]), List::from(vec![1, 2, 0]));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = List::from(vec![String::from("a")]);
        let mut copy = original.clone();
        copy[0].push('b');
        assert_eq!(original[0], "a");
        assert_eq!(copy[0], "ab");
    }

    #[test]
    #[should_panic(expected = "Index 3 out of range [0, 3)")]
    fn test_index_out_of_range_panics() {
        let list = List::from(vec![1, 2, 3]);
        let _value = list[3];
    }

    #[test]
    fn test_sequence_remove_shrinks() {
        let mut list = List::from(vec![1, 2]);
        assert_eq!(Sequence::remove(&mut list).unwrap(), 2);
        assert_eq!(list.capacity(), 1);
        assert_eq!(Sequence::remove(&mut list).unwrap(), 1);
        assert_eq!(
            Sequence::remove(&mut list).unwrap_err(),
            ListError::EmptyContainer
        );
    }

    #[test]
    fn test_clear_and_fill() {
        let mut list = List::with_value(3, 4u8).unwrap();
        assert_eq!(list.as_slice(), &[4, 4, 4]);
        list.fill(1);
        assert_eq!(list.as_slice(), &[1, 1, 1]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_serde_as_plain_sequence() {
        let list = List::from(vec![1, 2, 3]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: List<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
