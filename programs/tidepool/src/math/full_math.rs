//! Full precision math operations
//!
//! 256-bit intermediates for the Q64.64 price, liquidity and growth math.

use crate::errors::TidepoolError;
use anchor_lang::prelude::*;

pub use crate::constants::Q64;
pub use u256::U256;

// kept apart from the anchor prelude, whose `Result` and `Error` would
// shadow the ones the macro expands to
mod u256 {
    uint::construct_uint! {
        /// 256-bit unsigned integer for intermediate products and bitmap words
        pub struct U256(4);
    }
}

/// Narrow a 256-bit value back into u128
pub fn to_u128(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return Err(TidepoolError::MulDivOverflow.into());
    }
    Ok(value.low_u128())
}

/// Multiply two u128 numbers and divide by a third, with full precision
///
/// # Formula
/// result = floor(a * b / denominator)
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(TidepoolError::DivisionByZero.into());
    }
    let product = U256::from(a) * U256::from(b);
    to_u128(product / U256::from(denominator))
}

/// Multiply two u128 numbers and divide by a third, rounding up
pub fn mul_div_round_up(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(TidepoolError::DivisionByZero.into());
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let mut quotient = product / denominator;
    if !(product % denominator).is_zero() {
        quotient = quotient + U256::one();
    }
    to_u128(quotient)
}

/// Calculate (a * b) >> 64, rounding down
pub fn mul_q64(a: u128, b: u128) -> Result<u128> {
    to_u128((U256::from(a) * U256::from(b)) >> 64)
}

/// Floor of the square root of a Q64.64 ratio `numerator / denominator`,
/// returned in Q64.64
pub fn sqrt_ratio_q64(numerator: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(TidepoolError::DivisionByZero.into());
    }
    // ratio in Q128.128, its integer root lands in Q64.64
    let ratio = (U256::from(numerator) << 128) / U256::from(denominator);
    to_u128(ratio.integer_sqrt())
}
