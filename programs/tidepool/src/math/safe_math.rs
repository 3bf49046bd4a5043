//! Safe Math
//!
//! Checked arithmetic that maps overflow into protocol errors.

use crate::errors::TidepoolError;
use anchor_lang::prelude::*;
use num_traits::{CheckedAdd, CheckedSub};

/// Checked addition, overflow becomes `MathOverflow`
pub fn safe_add<T: CheckedAdd>(a: T, b: T) -> Result<T> {
    a.checked_add(&b).ok_or(TidepoolError::MathOverflow.into())
}

/// Checked subtraction, underflow becomes `MathUnderflow`
pub fn safe_sub<T: CheckedSub>(a: T, b: T) -> Result<T> {
    a.checked_sub(&b).ok_or(TidepoolError::MathUnderflow.into())
}

/// Convert an unsigned quantity into a signed flow
pub fn to_signed(value: u128) -> Result<i128> {
    i128::try_from(value).map_err(|_| TidepoolError::CastOverflow.into())
}

/// Apply a signed delta to an unsigned liquidity quantity
///
/// Liquidity never wraps: going below zero is `LiquidityUnderflow`,
/// exceeding `u128` is `LiquidityOverflow`.
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> Result<u128> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(TidepoolError::LiquidityUnderflow.into())
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or(TidepoolError::LiquidityOverflow.into())
    }
}
