//! # foam-lists
//!
//! Contiguous containers for mesh and field data: a dense exact-size list, an
//! amortized-growth list, a small-buffer list and a bit-packed boolean list.
//!
//! Every container separates its **logical length** from its **capacity**
//! and keeps the bytes it owns in a single ownership-typed buffer, released
//! automatically on drop.
//!
//! ## Features
//!
//! ### Containers
//!
//! - **[`List<T>`]** – dense list whose capacity always equals its length
//! - **[`DynamicList<T, MIN>`]** – geometric growth from a minimum capacity, O(1) amortized append
//! - **[`SmallInlineList<T, N>`]** – up to `N` elements inline, spilling to the heap past that
//! - **[`PackedBoolList`]** – one bit per entry in 64-bit blocks, with set algebra
//! - **[`Sequence<T>`]** – trait abstraction over append, remove, length and slice access
//!
//! ### Utility Macros
//!
//! - **[`list!`]**, **[`dynamic_list!`]**, **[`small_list!`]** – `vec!`-style literals
//! - **[`packed_bool_list!`]** – a bit list from the indices to set
//!
//! ## Errors and Configuration
//!
//! Fallible operations return [`Result`] with a [`ListError`]. The `Index`
//! operators panic with the same message. Index validation and the
//! behaviour of out-of-range unsets are selected with [`ListConfig`].
//!
//! ## Quick Examples
//!
//! ### Using DynamicList
//!
//! ```rust
//! use foam_lists::DynamicList;
//!
//! let mut list: DynamicList<i32, 4> = DynamicList::new();
//! for value in 0..5 {
//!     list.append(value).unwrap();
//! }
//! assert_eq!(list.len(), 5);
//! assert!(list.capacity() >= 8);
//!
//! list.remove_at(1, true).unwrap();
//! assert_eq!(list.as_slice(), &[0, 4, 2, 3]);
//! ```
//!
//! ### Using List
//!
//! ```rust
//! use foam_lists::List;
//!
//! let mut list = List::from(vec![1, 2, 3]);
//! list.set_size(5).unwrap();
//! assert_eq!(list.as_slice(), &[1, 2, 3, 0, 0]);
//! list.set_size(2).unwrap();
//! assert_eq!(list.as_slice(), &[1, 2]);
//! ```
//!
//! ### Using PackedBoolList
//!
//! ```rust
//! use foam_lists::PackedBoolList;
//!
//! let mut mask = PackedBoolList::with_len(10).unwrap();
//! mask.set_indices(&[2, 5, 7]).unwrap();
//! mask.unset_indices(&[5]).unwrap();
//! assert_eq!(mask.used().as_slice(), &[2, 7]);
//! ```
//!
//! ## Logging
//!
//! Reallocations, small-list spills and bit-list growth are reported as
//! `tracing` events at `trace` level. The crate installs no subscriber.
//!
//! [`List<T>`]: generic::list::List
//! [`DynamicList<T, MIN>`]: generic::dynamic_list::DynamicList
//! [`SmallInlineList<T, N>`]: generic::small_list::SmallInlineList
//! [`PackedBoolList`]: generic::packed_bool_list::PackedBoolList
//! [`Sequence<T>`]: generic::sequence::Sequence
//! [`list!`]: macro@list
//! [`dynamic_list!`]: macro@dynamic_list
//! [`small_list!`]: macro@small_list
//! [`packed_bool_list!`]: macro@packed_bool_list

pub mod config;
pub mod error;
pub mod generic;
pub mod macros;

#[cfg(test)]
mod tests;

pub use config::{BoundsCheck, ListConfig, UnsetPolicy};
pub use error::{ListError, Result};
pub use generic::dynamic_list::DynamicList;
pub use generic::list::List;
pub use generic::packed_bool_list::PackedBoolList;
pub use generic::sequence::Sequence;
pub use generic::small_list::SmallInlineList;
pub use generic::storage::Label;
