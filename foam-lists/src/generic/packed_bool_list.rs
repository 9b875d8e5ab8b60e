//! Bit-packed boolean sequence.
//!
//! [`PackedBoolList`] stores one bit per entry in 64-bit blocks and follows
//! the same length/capacity contract as the element lists, counted in bits.
//! It is typically used as a selection mask over mesh entities: which faces
//! are on a boundary, which cells have been visited.

use crate::config::{ListConfig, UnsetPolicy};
use crate::error::{ListError, Result};
use crate::generic::list::List;
use crate::generic::storage::{grow_capacity, HeapStorage, Storage};
use foam_safe_math::{div_ceil, safe_add, safe_mul};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not,
    SubAssign,
};
use tracing::trace;

/// Storage word of a [`PackedBoolList`].
pub type Block = u64;

pub const BITS_PER_BLOCK: usize = Block::BITS as usize;

/// Number of blocks needed to hold `bits` bits.
///
/// # Errors
///
/// Never fails for a non-zero block width; the `Result` comes from the
/// checked division helper.
pub fn blocks_for(bits: usize) -> Result<usize> {
    Ok(div_ceil(bits, BITS_PER_BLOCK)?)
}

fn locate(index: usize) -> (usize, Block) {
    (index / BITS_PER_BLOCK, 1 << (index % BITS_PER_BLOCK))
}

/// A growable list of booleans packed one bit per entry.
///
/// Bits at or past the length are always zero, including the unused high
/// bits of the last block, so block-wise comparisons and counts never see
/// stale data.
///
/// # Vivification
///
/// [`set`](Self::set) with an index past the end **grows the list** to
/// `index + 1`, zero-filling the gap. [`unset`](Self::unset) never grows;
/// what it does with an index past the end is chosen by the list's
/// [`UnsetPolicy`].
///
/// # Examples
///
/// ```rust
/// use foam_lists::generic::packed_bool_list::PackedBoolList;
///
/// let mut mask = PackedBoolList::with_len(10).unwrap();
/// assert_eq!(mask.set_indices(&[2, 5, 7]).unwrap(), 3);
/// assert_eq!(mask.used().as_slice(), &[2, 5, 7]);
///
/// assert_eq!(mask.unset_indices(&[5]).unwrap(), 1);
/// assert_eq!(mask.used().as_slice(), &[2, 7]);
///
/// // Setting past the end grows the list.
/// mask.set(20).unwrap();
/// assert_eq!(mask.len(), 21);
/// ```
#[derive(Default)]
pub struct PackedBoolList {
    blocks: HeapStorage<Block>,
    len: usize,
    policy: UnsetPolicy,
}

impl PackedBoolList {
    /// Creates an empty list with no storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list of `n` unset bits.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the blocks cannot be allocated.
    pub fn with_len(n: usize) -> Result<Self> {
        let mut list = Self::new();
        list.set_size(n)?;
        Ok(list)
    }

    /// Creates a list of `n` bits all equal to `value`.
    ///
    /// # Errors
    ///
    /// See [`with_len`](Self::with_len).
    pub fn with_value(n: usize, value: bool) -> Result<Self> {
        let mut list = Self::with_len(n)?;
        list.fill(value);
        Ok(list)
    }

    /// # Errors
    ///
    /// See [`with_len`](Self::with_len).
    pub fn from_bools(values: &[bool]) -> Result<Self> {
        let mut list = Self::with_len(values.len())?;
        for (index, &value) in values.iter().enumerate() {
            if value {
                list.set_bit(index);
            }
        }
        Ok(list)
    }

    /// Creates a list with the given bits set. The length is one past the
    /// largest index, or zero for no indices.
    ///
    /// # Errors
    ///
    /// See [`with_len`](Self::with_len).
    pub fn from_indices(indices: &[usize]) -> Result<Self> {
        let len = match indices.iter().max() {
            Some(&max) => safe_add(max, 1)?,
            None => 0,
        };
        Self::with_len_and_indices(len, indices)
    }

    /// Creates a list of `n` bits with the given bits set. Indices past `n`
    /// grow the list.
    ///
    /// # Errors
    ///
    /// See [`with_len`](Self::with_len).
    pub fn with_len_and_indices(n: usize, indices: &[usize]) -> Result<Self> {
        let mut list = Self::with_len(n)?;
        list.set_indices(indices)?;
        Ok(list)
    }

    /// Wraps raw blocks, bit `i` of the list being bit `i % 64` of block
    /// `i / 64`. Bits past `len` are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidOperation`] if `blocks` holds fewer than
    /// `len` bits.
    pub fn from_blocks(blocks: Vec<Block>, len: usize) -> Result<Self> {
        if safe_mul(blocks.len(), BITS_PER_BLOCK)? < len {
            return Err(ListError::InvalidOperation(
                "too few blocks for the requested length",
            ));
        }
        let mut list = Self {
            blocks: HeapStorage::from(blocks),
            len,
            policy: UnsetPolicy::default(),
        };
        list.clear_from(len);
        Ok(list)
    }

    /// Sets how [`unset`](Self::unset) treats indices past the end.
    pub fn with_unset_policy(mut self, policy: UnsetPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies the bit-list settings of a loaded [`ListConfig`].
    ///
    /// ```rust
    /// use foam_lists::{ListConfig, ListError, PackedBoolList};
    ///
    /// let mut mask = PackedBoolList::with_len(4)
    ///     .unwrap()
    ///     .with_config(&ListConfig::strict());
    /// assert!(matches!(mask.unset(9), Err(ListError::IndexOutOfRange { .. })));
    /// ```
    pub fn with_config(self, config: &ListConfig) -> Self {
        self.with_unset_policy(config.unset_policy)
    }

    pub fn unset_policy(&self) -> UnsetPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bits the storage holds without reallocating.
    pub fn capacity(&self) -> usize {
        self.blocks.capacity() * BITS_PER_BLOCK
    }

    /// Value of bit `index`; `false` past the end.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        let (block, mask) = locate(index);
        self.blocks.as_slice()[block] & mask != 0
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.blocks()
            .iter()
            .map(|block| block.count_ones() as usize)
            .sum()
    }

    /// Sets bit `index`, growing the list if `index >= len`. Returns `true`
    /// if the bit changed.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the list
    /// has to grow and cannot.
    pub fn set(&mut self, index: usize) -> Result<bool> {
        if index >= self.len {
            let len = safe_add(index, 1)?;
            trace!(old_len = self.len, new_len = len, "vivified packed bool list");
            self.set_size(len)?;
        }
        Ok(self.set_bit(index))
    }

    /// Clears bit `index`. Returns `true` if the bit changed.
    ///
    /// # Errors
    ///
    /// With [`UnsetPolicy::Strict`], returns [`ListError::IndexOutOfRange`]
    /// for `index >= len`. With [`UnsetPolicy::Ignore`] that case is
    /// `Ok(false)`.
    pub fn unset(&mut self, index: usize) -> Result<bool> {
        if index >= self.len {
            return match self.policy {
                UnsetPolicy::Ignore => Ok(false),
                UnsetPolicy::Strict => Err(ListError::out_of_range(index, self.len)),
            };
        }
        let (block, mask) = locate(index);
        let slot = &mut self.blocks.as_mut_slice()[block];
        let changed = *slot & mask != 0;
        *slot &= !mask;
        Ok(changed)
    }

    /// Sets every listed bit. Returns how many bits changed.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn set_indices(&mut self, indices: &[usize]) -> Result<usize> {
        if let Some(&max) = indices.iter().max() {
            self.reserve(safe_add(max, 1)?)?;
        }
        let mut changed = 0;
        for &index in indices {
            if self.set(index)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Clears every listed bit. Returns how many bits changed.
    ///
    /// # Errors
    ///
    /// See [`unset`](Self::unset).
    pub fn unset_indices(&mut self, indices: &[usize]) -> Result<usize> {
        let mut changed = 0;
        for &index in indices {
            if self.unset(index)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Sets every bit that is set in `other`, growing to `other.len()` if
    /// it is longer.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn set_from(&mut self, other: &PackedBoolList) -> Result<()> {
        self.or_with(other)
    }

    /// Clears every bit that is set in `other`. Never changes the length.
    pub fn unset_from(&mut self, other: &PackedBoolList) {
        for (dst, src) in self.blocks.as_mut_slice().iter_mut().zip(other.blocks()) {
            *dst &= !src;
        }
    }

    /// Keeps only the bits also set in `other`, truncating to
    /// `min(len, other.len())`.
    pub fn subset_from(&mut self, other: &PackedBoolList) {
        self.and_with(other);
    }

    /// Keeps only the listed bits; the length is unchanged and indices past
    /// the end are ignored. Returns the number of bits still set.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the selection mask cannot be
    /// allocated.
    pub fn subset_indices(&mut self, indices: &[usize]) -> Result<usize> {
        let mut keep = Self::with_len(self.len)?;
        for &index in indices.iter().filter(|&&index| index < self.len) {
            keep.set_bit(index);
        }
        self.and_with(&keep);
        Ok(self.count())
    }

    /// In-place intersection. The length becomes `min(len, other.len())`.
    pub fn and_with(&mut self, other: &PackedBoolList) {
        if self.len > other.len {
            self.truncate(other.len);
        }
        let used = self.used_blocks();
        for (dst, src) in self.blocks.as_mut_slice()[..used]
            .iter_mut()
            .zip(other.blocks())
        {
            *dst &= src;
        }
    }

    /// In-place union. The length becomes `max(len, other.len())`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the list has to grow and cannot.
    pub fn or_with(&mut self, other: &PackedBoolList) -> Result<()> {
        if other.len > self.len {
            self.set_size(other.len)?;
        }
        for (dst, src) in self.blocks.as_mut_slice().iter_mut().zip(other.blocks()) {
            *dst |= src;
        }
        Ok(())
    }

    /// In-place symmetric difference. The length becomes
    /// `max(len, other.len())`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] if the list has to grow and cannot.
    pub fn xor_with(&mut self, other: &PackedBoolList) -> Result<()> {
        if other.len > self.len {
            self.set_size(other.len)?;
        }
        for (dst, src) in self.blocks.as_mut_slice().iter_mut().zip(other.blocks()) {
            *dst ^= src;
        }
        Ok(())
    }

    /// Flips every bit within the length.
    pub fn complement(&mut self) {
        let used = self.used_blocks();
        for block in &mut self.blocks.as_mut_slice()[..used] {
            *block = !*block;
        }
        self.clear_from(self.len);
    }

    /// Indices of the set bits in increasing order.
    pub fn used(&self) -> List<usize> {
        let mut indices = Vec::with_capacity(self.count());
        for (block_index, &block) in self.blocks().iter().enumerate() {
            let mut word = block;
            while word != 0 {
                indices.push(block_index * BITS_PER_BLOCK + word.trailing_zeros() as usize);
                word &= word - 1;
            }
        }
        List::from(indices)
    }

    /// Iterates over the bits as booleans.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|index| self.get(index))
    }

    /// Ensures room for `n` bits. Grows in whole blocks, at least doubling.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Allocation`] or [`ListError::Math`] if the
    /// storage cannot grow.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        if n > self.capacity() {
            let current = self.blocks.capacity();
            self.blocks.resize(grow_capacity(current, blocks_for(n)?, 0)?)?;
        }
        Ok(())
    }

    /// Changes the length to `n`. New bits are unset; bits dropped by a
    /// shrink are cleared.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn set_size(&mut self, n: usize) -> Result<()> {
        if n < self.len {
            self.truncate(n);
        } else {
            self.reserve(n)?;
            self.len = n;
        }
        Ok(())
    }

    /// Changes the length to `n`, with new bits equal to `value`.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn resize_with(&mut self, n: usize, value: bool) -> Result<()> {
        let old = self.len;
        self.set_size(n)?;
        if value {
            for index in old..n {
                self.set_bit(index);
            }
        }
        Ok(())
    }

    /// Fits the storage to the length.
    ///
    /// # Errors
    ///
    /// See [`reserve`](Self::reserve).
    pub fn shrink(&mut self) -> Result<()> {
        let used = self.used_blocks();
        self.blocks.resize(used)
    }

    /// Sets the length to zero, keeping the storage.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Sets the length to zero and releases the storage.
    pub fn clear_storage(&mut self) {
        self.blocks.release();
        self.len = 0;
    }

    /// Sets every bit within the length to `value`.
    pub fn fill(&mut self, value: bool) {
        let used = self.used_blocks();
        let word = if value { Block::MAX } else { 0 };
        self.blocks.as_mut_slice()[..used].fill(word);
        self.clear_from(self.len);
    }

    /// Takes `other`'s bits, leaving it empty. The policy stays as is.
    pub fn transfer_from(&mut self, other: &mut PackedBoolList) {
        self.blocks = std::mem::take(&mut other.blocks);
        self.len = std::mem::take(&mut other.len);
    }

    /// The blocks covering the length.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks.as_slice()[..self.used_blocks()]
    }

    /// [`blocks`](Self::blocks) reinterpreted as bytes in native order.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.blocks())
    }

    fn used_blocks(&self) -> usize {
        self.len.div_ceil(BITS_PER_BLOCK)
    }

    fn set_bit(&mut self, index: usize) -> bool {
        let (block, mask) = locate(index);
        let slot = &mut self.blocks.as_mut_slice()[block];
        let changed = *slot & mask == 0;
        *slot |= mask;
        changed
    }

    fn truncate(&mut self, n: usize) {
        self.clear_from(n);
        self.len = n;
    }

    /// Zeroes every stored bit at position `bit` or later.
    fn clear_from(&mut self, bit: usize) {
        let (block, _) = locate(bit);
        let slots = self.blocks.as_mut_slice();
        if block >= slots.len() {
            return;
        }
        let offset = bit % BITS_PER_BLOCK;
        let tail = if offset == 0 {
            block
        } else {
            slots[block] &= (1 << offset) - 1;
            block + 1
        };
        slots[tail..].fill(0);
    }
}

impl Clone for PackedBoolList {
    fn clone(&self) -> Self {
        Self {
            blocks: HeapStorage::from(self.blocks().to_vec()),
            len: self.len,
            policy: self.policy,
        }
    }
}

/// Logical equality: same length and same bits. The unset policy and the
/// capacity are ignored.
impl PartialEq for PackedBoolList {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.blocks() == other.blocks()
    }
}

impl Eq for PackedBoolList {}

impl fmt::Debug for PackedBoolList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedBoolList")
            .field("len", &self.len)
            .field("used", &self.used())
            .finish()
    }
}

impl BitAndAssign<&PackedBoolList> for PackedBoolList {
    fn bitand_assign(&mut self, rhs: &PackedBoolList) {
        self.and_with(rhs);
    }
}

impl BitOrAssign<&PackedBoolList> for PackedBoolList {
    /// # Panics
    ///
    /// Panics if the list has to grow and cannot; use
    /// [`or_with`](PackedBoolList::or_with) to handle that case.
    fn bitor_assign(&mut self, rhs: &PackedBoolList) {
        if let Err(err) = self.or_with(rhs) {
            panic!("{err}");
        }
    }
}

impl BitXorAssign<&PackedBoolList> for PackedBoolList {
    /// # Panics
    ///
    /// Panics if the list has to grow and cannot; use
    /// [`xor_with`](PackedBoolList::xor_with) to handle that case.
    fn bitxor_assign(&mut self, rhs: &PackedBoolList) {
        if let Err(err) = self.xor_with(rhs) {
            panic!("{err}");
        }
    }
}

impl AddAssign<&PackedBoolList> for PackedBoolList {
    fn add_assign(&mut self, rhs: &PackedBoolList) {
        *self |= rhs;
    }
}

impl SubAssign<&PackedBoolList> for PackedBoolList {
    fn sub_assign(&mut self, rhs: &PackedBoolList) {
        self.unset_from(rhs);
    }
}

impl BitAnd for &PackedBoolList {
    type Output = PackedBoolList;

    fn bitand(self, rhs: &PackedBoolList) -> PackedBoolList {
        let mut result = self.clone();
        result &= rhs;
        result
    }
}

impl BitOr for &PackedBoolList {
    type Output = PackedBoolList;

    fn bitor(self, rhs: &PackedBoolList) -> PackedBoolList {
        let mut result = self.clone();
        result |= rhs;
        result
    }
}

impl BitXor for &PackedBoolList {
    type Output = PackedBoolList;

    fn bitxor(self, rhs: &PackedBoolList) -> PackedBoolList {
        let mut result = self.clone();
        result ^= rhs;
        result
    }
}

impl Add for &PackedBoolList {
    type Output = PackedBoolList;

    fn add(self, rhs: &PackedBoolList) -> PackedBoolList {
        self | rhs
    }
}

impl Not for PackedBoolList {
    type Output = PackedBoolList;

    fn not(mut self) -> PackedBoolList {
        self.complement();
        self
    }
}

impl Not for &PackedBoolList {
    type Output = PackedBoolList;

    fn not(self) -> PackedBoolList {
        !self.clone()
    }
}

impl Serialize for PackedBoolList {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for PackedBoolList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let values = Vec::<bool>::deserialize(deserializer)?;
        Self::from_bools(&values).map_err(de::Error::custom)
    }
}
