//! Common trait for the list containers.
//!
//! [`Sequence`] abstracts over anything with a logical length, a capacity and
//! append/remove at the back, so generic code can work with [`List`],
//! [`DynamicList`], [`SmallInlineList`] and `Vec` alike. The provided methods
//! add the checked accessors and cyclic neighbour lookups every list shares.
//!
//! [`List`]: crate::generic::list::List
//! [`DynamicList`]: crate::generic::dynamic_list::DynamicList
//! [`SmallInlineList`]: crate::generic::small_list::SmallInlineList

use crate::config::{BoundsCheck, ListConfig};
use crate::error::{ListError, Result};

/// A growable sequence addressed by index.
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::{dynamic_list::DynamicList, sequence::Sequence};
///
/// fn work_with_sequence<S: Sequence<i32>>(sequence: &mut S) {
///     sequence.append(42).unwrap();
///     sequence.append(100).unwrap();
///     assert_eq!(sequence.len(), 2);
///     assert_eq!(sequence.remove().unwrap(), 100);
///     assert_eq!(sequence.as_slice(), &[42]);
/// }
///
/// let mut list = DynamicList::<i32, 16>::new();
/// work_with_sequence(&mut list);
///
/// let mut vec = Vec::new();
/// work_with_sequence(&mut vec);
/// ```
pub trait Sequence<T> {
    /// Adds an element after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the sequence cannot grow.
    fn append(&mut self, item: T) -> Result<()>;

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyContainer`] if there is nothing to remove.
    fn remove(&mut self) -> Result<T>;

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    fn len(&self) -> usize;

    /// Number of elements the sequence can hold without reallocating.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked element access.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] with the index and the length.
    fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(ListError::out_of_range(index, len))
    }

    /// Checked mutable element access.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] with the index and the length.
    fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ListError::out_of_range(index, len))
    }

    /// Element access honouring a [`BoundsCheck`] setting.
    ///
    /// # Errors
    ///
    /// With [`BoundsCheck::Checked`], returns [`ListError::IndexOutOfRange`].
    ///
    /// # Safety
    ///
    /// With [`BoundsCheck::Unchecked`] the index is not validated outside
    /// debug builds, and the caller must guarantee `index < len`.
    unsafe fn checked(&self, index: usize, mode: BoundsCheck) -> Result<&T> {
        match mode {
            BoundsCheck::Checked => self.at(index),
            BoundsCheck::Unchecked => {
                let items = self.as_slice();
                debug_assert!(index < items.len(), "unchecked index {index} out of range");
                // SAFETY: the caller guarantees `index < len` in unchecked mode.
                Ok(unsafe { items.get_unchecked(index) })
            }
        }
    }

    /// [`checked`](Self::checked) using the bounds setting of `config`.
    ///
    /// # Errors
    ///
    /// See [`checked`](Self::checked).
    ///
    /// # Safety
    ///
    /// See [`checked`](Self::checked).
    unsafe fn get_with(&self, index: usize, config: &ListConfig) -> Result<&T> {
        // SAFETY: forwarded to the caller.
        unsafe { self.checked(index, config.bounds_check) }
    }

    /// Index of the next element, wrapping to the front.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidOperation`] on an empty sequence.
    fn fc_index(&self, index: usize) -> Result<usize> {
        match self.len() {
            0 => Err(ListError::InvalidOperation("cyclic index into an empty list")),
            len => Ok((index % len + 1) % len),
        }
    }

    /// Index of the previous element, wrapping to the back.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidOperation`] on an empty sequence.
    fn rc_index(&self, index: usize) -> Result<usize> {
        match self.len() {
            0 => Err(ListError::InvalidOperation("cyclic index into an empty list")),
            len => Ok((index % len + len - 1) % len),
        }
    }

    /// # Errors
    ///
    /// Returns [`ListError::InvalidOperation`] on an empty sequence.
    fn fc_value(&self, index: usize) -> Result<&T> {
        let next = self.fc_index(index)?;
        self.at(next)
    }

    /// # Errors
    ///
    /// Returns [`ListError::InvalidOperation`] on an empty sequence.
    fn rc_value(&self, index: usize) -> Result<&T> {
        let prev = self.rc_index(index)?;
        self.at(prev)
    }

    /// Position of the first element equal to `item`. Linear scan.
    fn find(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice().iter().position(|candidate| candidate == item)
    }

    fn found(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(item).is_some()
    }
}

/// Implementation for standard library [`Vec`].
///
/// Appending never fails short of the allocator aborting.
impl<T> Sequence<T> for Vec<T> {
    fn append(&mut self, item: T) -> Result<()> {
        self.push(item);
        Ok(())
    }

    fn remove(&mut self) -> Result<T> {
        self.pop().ok_or(ListError::EmptyContainer)
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
