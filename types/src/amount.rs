//! Checked fixed-point arithmetic for ledger amounts.
//!
//! Amounts are raw integer units (u128) of an asset with a fixed number of
//! decimals. Every ratio computation goes through [`mul_div_floor`] or
//! [`mul_div_ceil`], which evaluate `a * b / d` with a 256-bit intermediate
//! product, so the only overflow is a quotient that does not fit in u128.

use primitive_types::U256;
use thiserror::Error;

/// Failure of a checked fixed-point computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,
}

/// `10^decimals` as a raw-unit scale factor.
pub fn pow10(decimals: u8) -> Result<u128, MathError> {
    10u128
        .checked_pow(u32::from(decimals))
        .ok_or(MathError::Overflow)
}

/// `floor(a * b / d)`.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128, MathError> {
    mul_div(a, b, d).map(|(q, _)| q)
}

/// `ceil(a * b / d)`.
pub fn mul_div_ceil(a: u128, b: u128, d: u128) -> Result<u128, MathError> {
    let (q, r) = mul_div(a, b, d)?;
    if r == 0 {
        Ok(q)
    } else {
        q.checked_add(1).ok_or(MathError::Overflow)
    }
}

/// Quotient and remainder of `a * b / d`.
fn mul_div(a: u128, b: u128, d: u128) -> Result<(u128, u128), MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    if let Some(p) = a.checked_mul(b) {
        return Ok((p / d, p % d));
    }
    // Two u128 factors always fit in 256 bits.
    let (q, r) = (U256::from(a) * U256::from(b)).div_mod(U256::from(d));
    if q.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok((q.low_u128(), r.low_u128()))
}
