//! Sqrt Price Math
//!
//! Functions for computing the next sqrt price given token deltas.
//! Base tokens move the root price linearly, quote tokens move its reciprocal.

use crate::errors::TidepoolError;
use crate::math::full_math::{mul_div, mul_div_round_up, to_u128, Q64, U256};
use anchor_lang::prelude::*;

/// Get the next sqrt price after adding or removing base tokens
///
/// Adding base (buying, price goes up):
///   new_sqrt_price = sqrt_price + amount / L, rounded down
///
/// Removing base (selling, price goes down):
///   new_sqrt_price = sqrt_price - amount / L, the step rounded up
pub fn get_next_sqrt_price_from_base(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }

    if add {
        let quotient = mul_div(amount, Q64, liquidity)?;
        sqrt_price_x64
            .checked_add(quotient)
            .ok_or(TidepoolError::SqrtPriceAboveMaximum.into())
    } else {
        let quotient = mul_div_round_up(amount, Q64, liquidity)?;
        if quotient >= sqrt_price_x64 {
            return Err(TidepoolError::SqrtPriceBelowMinimum.into());
        }
        Ok(sqrt_price_x64 - quotient)
    }
}

/// Get the next sqrt price after adding or removing quote tokens, rounded up
///
/// Adding quote (selling, price goes down):
///   new_sqrt_price = L * sqrt_price / (L + amount * sqrt_price)
///
/// Removing quote (buying, price goes up):
///   new_sqrt_price = L * sqrt_price / (L - amount * sqrt_price)
pub fn get_next_sqrt_price_from_quote(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u128,
    add: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }

    let numerator = U256::from(liquidity) << 64;
    let price = U256::from(sqrt_price_x64);

    if add {
        // numerator / (numerator / P + amount), the floored divisor rounds the result up
        let divisor = numerator / price + U256::from(amount);
        let (quotient, remainder) = numerator.div_mod(divisor);
        let rounded = if remainder.is_zero() {
            quotient
        } else {
            quotient + U256::one()
        };
        to_u128(rounded)
    } else {
        let product = U256::from(amount)
            .checked_mul(price)
            .ok_or(TidepoolError::MathOverflow)?;
        if product >= numerator {
            return Err(TidepoolError::SqrtPriceAboveMaximum.into());
        }
        let denominator = numerator - product;
        let scaled = numerator
            .checked_mul(price)
            .ok_or(TidepoolError::MathOverflow)?;
        let (quotient, remainder) = scaled.div_mod(denominator);
        let rounded = if remainder.is_zero() {
            quotient
        } else {
            quotient + U256::one()
        };
        to_u128(rounded)
    }
}

/// Get the next sqrt price from input amount
/// Buys pay base, sells pay quote
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_in: u128,
    is_buy: bool,
) -> Result<u128> {
    if is_buy {
        get_next_sqrt_price_from_base(sqrt_price_x64, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_quote(sqrt_price_x64, liquidity, amount_in, true)
    }
}

/// Get the next sqrt price from output amount
/// Buys receive quote, sells receive base
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_out: u128,
    is_buy: bool,
) -> Result<u128> {
    if is_buy {
        get_next_sqrt_price_from_quote(sqrt_price_x64, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_base(sqrt_price_x64, liquidity, amount_out, false)
    }
}
