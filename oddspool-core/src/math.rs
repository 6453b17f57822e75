//! # Fixed-Point Math
//!
//! Checked integer helpers shared by the pricing engine and the ledgers.
//!
//! Intermediates are carried as 256-bit unsigned integers so that products of
//! two scaled values (and the squares taken by the margin transform) never wrap.
//! Any overflow, underflow or division by zero surfaces as
//! [`CoreError::ArithmeticOverflow`]. All divisions floor.

use primitive_types::U256;

use crate::{error::Result, CoreError};

/// Widen a `u128` into a 256-bit intermediate.
pub fn wide(value: u128) -> U256 {
    U256::from(value)
}

/// Narrow a 256-bit intermediate back into a `u128`.
pub fn narrow(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return Err(CoreError::ArithmeticOverflow);
    }
    Ok(value.low_u128())
}

pub fn add(a: U256, b: U256) -> Result<U256> {
    a.checked_add(b).ok_or(CoreError::ArithmeticOverflow)
}

pub fn sub(a: U256, b: U256) -> Result<U256> {
    a.checked_sub(b).ok_or(CoreError::ArithmeticOverflow)
}

pub fn mul(a: U256, b: U256) -> Result<U256> {
    a.checked_mul(b).ok_or(CoreError::ArithmeticOverflow)
}

pub fn div(a: U256, b: U256) -> Result<U256> {
    a.checked_div(b).ok_or(CoreError::ArithmeticOverflow)
}

/// `floor(a * b / denominator)` without intermediate overflow.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    narrow(div(mul(wide(a), wide(b))?, wide(denominator))?)
}

/// Round `value` up to the next multiple of `step`.
///
/// Values below one whole unit (`scale`) are lifted to exactly one unit, so the
/// result is never smaller than `scale`.
pub fn ceil_step(value: U256, step: U256, scale: U256) -> Result<U256> {
    if value < scale {
        return Ok(scale);
    }
    let bumped = sub(add(value, step)?, U256::one())?;
    mul(div(bumped, step)?, step)
}

/// Floor square root.
pub fn isqrt(value: U256) -> U256 {
    value.integer_sqrt()
}

/// Checked `u128` addition.
pub fn checked_add(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or(CoreError::ArithmeticOverflow)
}

/// Checked `u128` subtraction.
pub fn checked_sub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or(CoreError::ArithmeticOverflow)
}
