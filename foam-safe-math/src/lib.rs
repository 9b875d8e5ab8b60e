//! Checked arithmetic for container sizing.
//!
//! Every capacity computation in `foam-lists` goes through these helpers so
//! that an oversized request surfaces as a [`MathError`] instead of wrapping.

use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Zero};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Addition overflowed")]
    AdditionOverflow,
    #[error("Subtraction overflowed")]
    SubtractionOverflow,
    #[error("Multiplication overflowed")]
    MultiplicationOverflow,
    #[error("Division by zero")]
    DivisionByZero,
}

pub fn safe_add<T>(a: T, b: T) -> Result<T, MathError>
where
    T: CheckedAdd,
{
    a.checked_add(&b).ok_or(MathError::AdditionOverflow)
}

pub fn safe_sub<T>(a: T, b: T) -> Result<T, MathError>
where
    T: CheckedSub,
{
    a.checked_sub(&b).ok_or(MathError::SubtractionOverflow)
}

pub fn safe_mul<T>(a: T, b: T) -> Result<T, MathError>
where
    T: CheckedMul,
{
    a.checked_mul(&b).ok_or(MathError::MultiplicationOverflow)
}

/// Ceiling division, e.g. the number of 64-bit blocks needed for `a` bits.
pub fn div_ceil<T>(a: T, b: T) -> Result<T, MathError>
where
    T: CheckedAdd + CheckedSub + CheckedDiv + Zero + One + Copy,
{
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    if a.is_zero() {
        return Ok(T::zero());
    }
    // (a - 1) / b + 1 cannot overflow for a > 0.
    let q = safe_sub(a, T::one())?
        .checked_div(&b)
        .ok_or(MathError::DivisionByZero)?;
    safe_add(q, T::one())
}
