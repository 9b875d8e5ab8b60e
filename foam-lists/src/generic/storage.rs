//! Owned element storage shared by every list in the crate.
//!
//! A [`Storage`] implementation owns a block of default-initialized slots and
//! knows how to allocate, resize and release it. Lists hold one by
//! composition and keep track of how many of the slots are live.

use crate::error::{ListError, Result};
use foam_safe_math::{safe_add, safe_mul};
use std::alloc::Layout;
use tracing::trace;

/// Signed size type used by the surrounding toolkit.
pub type Label = i64;

/// Capability set of a contiguous element store.
///
/// Every slot is always a valid `T`. Slots that a list does not consider
/// live hold `T::default()`.
pub trait Storage<T>: Default {
    /// Allocates exactly `capacity` default slots.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] when the byte size overflows.
    fn allocate(capacity: usize) -> Result<Self>;

    /// Number of slots currently held.
    fn capacity(&self) -> usize;

    /// Changes the number of slots to `capacity`, preserving the first
    /// `min(capacity, old)` slots. Storage with a fixed minimum may keep
    /// more slots than requested.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] when the byte size overflows.
    fn resize(&mut self, capacity: usize) -> Result<()>;

    /// Drops every slot and returns to the empty state.
    fn release(&mut self);

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    /// Consumes the storage, returning all of its slots.
    fn into_vec(self) -> Vec<T>;
}

/// Validates that `n` elements of `T` fit in a single allocation.
///
/// # Errors
///
/// Returns [`ListError::Allocation`] if `n * size_of::<T>()` exceeds
/// `isize::MAX`.
pub fn checked_capacity<T>(n: usize) -> Result<usize> {
    Layout::array::<T>(n).map_err(|_| ListError::Allocation {
        requested: n as i128,
    })?;
    Ok(n)
}

/// Converts a signed size into a `usize`.
///
/// # Errors
///
/// Returns [`ListError::Allocation`] for negative sizes.
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::storage::size_from_label;
///
/// assert_eq!(size_from_label(4).unwrap(), 4);
/// assert!(size_from_label(-1).is_err());
/// ```
pub fn size_from_label(label: Label) -> Result<usize> {
    usize::try_from(label).map_err(|_| ListError::Allocation {
        requested: i128::from(label),
    })
}

/// Capacity after growing `current` so that it holds at least `required`.
///
/// The result is `max(floor, required, 2 * current)`; doubling keeps a run of
/// appends at O(1) amortized cost.
///
/// # Errors
///
/// Returns [`ListError::Math`] if doubling overflows.
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::storage::grow_capacity;
///
/// assert_eq!(grow_capacity(0, 1, 16).unwrap(), 16);
/// assert_eq!(grow_capacity(16, 17, 16).unwrap(), 32);
/// assert_eq!(grow_capacity(16, 100, 16).unwrap(), 100);
/// ```
pub fn grow_capacity(current: usize, required: usize, floor: usize) -> Result<usize> {
    let doubled = safe_mul(current, 2)?;
    Ok(floor.max(required).max(doubled))
}

/// Growth used by the small-buffer list: `max(required, 2 * current + 2)`.
///
/// # Errors
///
/// Returns [`ListError::Math`] on overflow.
pub fn grow_capacity_small(current: usize, required: usize) -> Result<usize> {
    let grown = safe_add(safe_mul(current, 2)?, 2)?;
    Ok(required.max(grown))
}

/// Heap storage sized exactly to its capacity.
pub struct HeapStorage<T> {
    slots: Box<[T]>,
}

impl<T> Default for HeapStorage<T> {
    fn default() -> Self {
        Self {
            slots: Box::default(),
        }
    }
}

impl<T> HeapStorage<T> {
    /// Address of the first slot. Stable across moves of the storage.
    pub fn as_ptr(&self) -> *const T {
        self.slots.as_ptr()
    }
}

impl<T> From<Vec<T>> for HeapStorage<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            slots: items.into_boxed_slice(),
        }
    }
}

impl<T: Default> Storage<T> for HeapStorage<T> {
    fn allocate(capacity: usize) -> Result<Self> {
        checked_capacity::<T>(capacity)?;
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, T::default);
        Ok(Self::from(slots))
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn resize(&mut self, capacity: usize) -> Result<()> {
        let old_capacity = self.slots.len();
        if capacity == old_capacity {
            return Ok(());
        }
        checked_capacity::<T>(capacity)?;

        let mut slots = Vec::with_capacity(capacity);
        slots.extend(std::mem::take(&mut self.slots).into_vec().into_iter().take(capacity));
        slots.resize_with(capacity, T::default);
        self.slots = slots.into_boxed_slice();

        trace!(old_capacity, new_capacity = capacity, "reallocated heap storage");
        Ok(())
    }

    fn release(&mut self) {
        self.slots = Box::default();
    }

    fn as_slice(&self) -> &[T] {
        &self.slots
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }

    fn into_vec(self) -> Vec<T> {
        self.slots.into_vec()
    }
}

/// Inline slots for small lists, spilling to [`HeapStorage`] past `N`.
///
/// While inline the capacity is `N`. Resizing to `N` or fewer slots moves
/// the elements back inline.
pub enum SpillStorage<T, const N: usize> {
    Inline([T; N]),
    Heap(HeapStorage<T>),
}

impl<T: Default, const N: usize> Default for SpillStorage<T, N> {
    fn default() -> Self {
        SpillStorage::Inline(core::array::from_fn(|_| T::default()))
    }
}

impl<T, const N: usize> SpillStorage<T, N> {
    pub fn is_inline(&self) -> bool {
        matches!(self, SpillStorage::Inline(_))
    }
}

impl<T: Default, const N: usize> Storage<T> for SpillStorage<T, N> {
    fn allocate(capacity: usize) -> Result<Self> {
        if capacity <= N {
            Ok(Self::default())
        } else {
            HeapStorage::allocate(capacity).map(SpillStorage::Heap)
        }
    }

    fn capacity(&self) -> usize {
        match self {
            SpillStorage::Inline(_) => N,
            SpillStorage::Heap(heap) => heap.capacity(),
        }
    }

    fn resize(&mut self, capacity: usize) -> Result<()> {
        match self {
            SpillStorage::Inline(items) if capacity > N => {
                let mut heap = HeapStorage::allocate(capacity)?;
                for (dst, src) in heap.as_mut_slice().iter_mut().zip(items.iter_mut()) {
                    std::mem::swap(dst, src);
                }
                trace!(inline = N, new_capacity = capacity, "spilled small list to heap");
                *self = SpillStorage::Heap(heap);
            }
            SpillStorage::Inline(_) => {}
            SpillStorage::Heap(heap) if capacity > N => heap.resize(capacity)?,
            SpillStorage::Heap(heap) => {
                let mut items: [T; N] = core::array::from_fn(|_| T::default());
                for (dst, src) in items
                    .iter_mut()
                    .zip(heap.as_mut_slice().iter_mut())
                    .take(capacity)
                {
                    std::mem::swap(dst, src);
                }
                trace!(old_capacity = heap.capacity(), inline = N, "collapsed small list inline");
                *self = SpillStorage::Inline(items);
            }
        }
        Ok(())
    }

    fn release(&mut self) {
        *self = Self::default();
    }

    fn as_slice(&self) -> &[T] {
        match self {
            SpillStorage::Inline(items) => items,
            SpillStorage::Heap(heap) => heap.as_slice(),
        }
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            SpillStorage::Inline(items) => items,
            SpillStorage::Heap(heap) => heap.as_mut_slice(),
        }
    }

    fn into_vec(self) -> Vec<T> {
        match self {
            SpillStorage::Inline(items) => Vec::from(items),
            SpillStorage::Heap(heap) => heap.into_vec(),
        }
    }
}
