//! Liquidity Math
//!
//! Token flows implied by a quantity of liquidity over a root price interval.
//! Price is base per quote, so the base side moves linearly in the root price
//! and the quote side moves in its reciprocal.

use crate::errors::TidepoolError;
use crate::math::full_math::{mul_div, mul_div_round_up, to_u128, Q64, U256};
use anchor_lang::prelude::*;

fn ordered(sqrt_price_a_x64: u128, sqrt_price_b_x64: u128) -> (u128, u128) {
    if sqrt_price_a_x64 < sqrt_price_b_x64 {
        (sqrt_price_a_x64, sqrt_price_b_x64)
    } else {
        (sqrt_price_b_x64, sqrt_price_a_x64)
    }
}

/// Base tokens between two root prices
///
/// base = liquidity * (sqrt_price_upper - sqrt_price_lower)
pub fn get_base_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (lower, upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    let diff = upper - lower;

    if round_up {
        mul_div_round_up(liquidity, diff, Q64)
    } else {
        mul_div(liquidity, diff, Q64)
    }
}

/// Quote tokens between two root prices
///
/// quote = liquidity * (1/sqrt_price_lower - 1/sqrt_price_upper)
///       = liquidity * (sqrt_price_upper - sqrt_price_lower) / (sqrt_price_upper * sqrt_price_lower)
pub fn get_quote_delta(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (lower, upper) = ordered(sqrt_price_a_x64, sqrt_price_b_x64);
    if lower == 0 {
        return Err(TidepoolError::DivisionByZero.into());
    }
    let diff = upper - lower;

    // single division while L * diff * 2^64 fits in 256 bits
    let product = U256::from(liquidity) * U256::from(diff);
    if let Some(numerator) = product.checked_mul(U256::from(Q64)) {
        let denominator = U256::from(upper) * U256::from(lower);
        let (quotient, remainder) = numerator.div_mod(denominator);
        let rounded = if round_up && !remainder.is_zero() {
            quotient + U256::one()
        } else {
            quotient
        };
        return to_u128(rounded);
    }

    // otherwise divide in two steps, each rounded the same way
    if round_up {
        let step = mul_div_round_up(liquidity, diff, upper)?;
        mul_div_round_up(step, Q64, lower)
    } else {
        let step = mul_div(liquidity, diff, upper)?;
        mul_div(step, Q64, lower)
    }
}

/// Token amounts backing `liquidity` over [lower, upper] at the current root price
///
/// Returns (base, quote). Below the range the position is all quote, above it
/// all base.
pub fn get_amounts_for_liquidity(
    sqrt_price_current_x64: u128,
    sqrt_price_lower_x64: u128,
    sqrt_price_upper_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u128, u128)> {
    if sqrt_price_current_x64 <= sqrt_price_lower_x64 {
        let quote = get_quote_delta(
            sqrt_price_lower_x64,
            sqrt_price_upper_x64,
            liquidity,
            round_up,
        )?;
        Ok((0, quote))
    } else if sqrt_price_current_x64 < sqrt_price_upper_x64 {
        let base = get_base_delta(
            sqrt_price_lower_x64,
            sqrt_price_current_x64,
            liquidity,
            round_up,
        )?;
        let quote = get_quote_delta(
            sqrt_price_current_x64,
            sqrt_price_upper_x64,
            liquidity,
            round_up,
        )?;
        Ok((base, quote))
    } else {
        let base = get_base_delta(
            sqrt_price_lower_x64,
            sqrt_price_upper_x64,
            liquidity,
            round_up,
        )?;
        Ok((base, 0))
    }
}

/// Virtual reserves of full-range liquidity at a root price
///
/// base = L * P, quote = L / P
pub fn get_ambient_reserves(
    sqrt_price_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<(u128, u128)> {
    if round_up {
        Ok((
            mul_div_round_up(liquidity, sqrt_price_x64, Q64)?,
            mul_div_round_up(liquidity, Q64, sqrt_price_x64)?,
        ))
    } else {
        Ok((
            mul_div(liquidity, sqrt_price_x64, Q64)?,
            mul_div(liquidity, Q64, sqrt_price_x64)?,
        ))
    }
}
