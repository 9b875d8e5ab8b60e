use foam_safe_math::MathError;
use thiserror::Error;

/// Errors raised by the list containers.
///
/// These are the fail-fast conditions of the container family. Operations
/// that can hit them return [`Result`]; the `Index` operators panic with the
/// same diagnostic instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// An index outside `[0, len)` was used with a checked accessor.
    #[error("Index {index} out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// `remove()` on a list with no elements.
    #[error("List is empty")]
    EmptyContainer,

    /// The operation makes no sense for the current state of the list.
    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),

    /// The requested size is negative or does not fit in the address space.
    #[error("Cannot allocate storage for {requested} elements")]
    Allocation { requested: i128 },

    #[error(transparent)]
    Math(#[from] MathError),
}

impl ListError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        ListError::IndexOutOfRange { index, len }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ListError>;
