//! Swap Math
//!
//! Single-step swap computation over a constant liquidity segment, plus the
//! fee helpers used by the curve engine.

use crate::constants::{FEE_RATE_DENOMINATOR, PROTOCOL_FEE_RATE_DENOMINATOR};
use crate::errors::TidepoolError;
use crate::math::full_math::{mul_div, mul_div_round_up};
use crate::math::liquidity_math::{get_base_delta, get_quote_delta};
use crate::math::sqrt_price_math::{
    get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};
use anchor_lang::prelude::*;

/// Result of a single swap step computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStepResult {
    /// The new sqrt price after the swap step
    pub sqrt_price_next_x64: u128,
    /// Amount of input token consumed, fees excluded
    pub amount_in: u128,
    /// Amount of output token produced
    pub amount_out: u128,
}

/// Input needed to move the price from current to target, rounded up
pub fn input_to_target(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    is_buy: bool,
) -> Result<u128> {
    if is_buy {
        get_base_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, true)
    } else {
        get_quote_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, true)
    }
}

/// Output released by moving the price from current to target, rounded down
pub fn output_to_target(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    is_buy: bool,
) -> Result<u128> {
    if is_buy {
        get_quote_delta(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, false)
    } else {
        get_base_delta(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, false)
    }
}

/// Compute the fee-free result of a single swap step
///
/// # Arguments
/// * `sqrt_price_current_x64` - Current sqrt price (Q64.64)
/// * `sqrt_price_target_x64` - Target sqrt price (boundary tick or limit)
/// * `liquidity` - Active liquidity over the segment
/// * `amount_remaining` - Budget of input (exact input) or wanted output
/// * `exact_input` - true if amount_remaining denominates the input side
/// * `is_buy` - true if paying base for quote (price increasing)
///
/// Input rounds up, output rounds down. An exact-input step that stops short
/// of the target consumes its whole budget.
pub fn compute_swap_step(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    amount_remaining: u128,
    exact_input: bool,
    is_buy: bool,
) -> Result<SwapStepResult> {
    let sqrt_price_next_x64: u128;
    let amount_in: u128;
    let amount_out: u128;

    if exact_input {
        let amount_in_max = input_to_target(
            sqrt_price_current_x64,
            sqrt_price_target_x64,
            liquidity,
            is_buy,
        )?;

        if amount_remaining >= amount_in_max {
            sqrt_price_next_x64 = sqrt_price_target_x64;
            amount_in = amount_in_max;
        } else {
            sqrt_price_next_x64 = get_next_sqrt_price_from_input(
                sqrt_price_current_x64,
                liquidity,
                amount_remaining,
                is_buy,
            )?;
            amount_in = amount_remaining;
        }

        amount_out = output_to_target(
            sqrt_price_current_x64,
            sqrt_price_next_x64,
            liquidity,
            is_buy,
        )?;
    } else {
        let amount_out_max = output_to_target(
            sqrt_price_current_x64,
            sqrt_price_target_x64,
            liquidity,
            is_buy,
        )?;

        if amount_remaining >= amount_out_max {
            sqrt_price_next_x64 = sqrt_price_target_x64;
            amount_out = amount_out_max;
        } else {
            sqrt_price_next_x64 = get_next_sqrt_price_from_output(
                sqrt_price_current_x64,
                liquidity,
                amount_remaining,
                is_buy,
            )?;
            amount_out = amount_remaining;
        }

        amount_in = input_to_target(
            sqrt_price_current_x64,
            sqrt_price_next_x64,
            liquidity,
            is_buy,
        )?;
    }

    Ok(SwapStepResult {
        sqrt_price_next_x64,
        amount_in,
        amount_out,
    })
}

/// Portion of a gross input left after the fee, rounded down
pub fn amount_less_fee(amount: u128, fee_rate: u32) -> Result<u128> {
    mul_div(
        amount,
        (FEE_RATE_DENOMINATOR - fee_rate) as u128,
        FEE_RATE_DENOMINATOR as u128,
    )
}

/// Fee charged on top of a net input, rounded up
///
/// fee = amount_in * fee_rate / (1_000_000 - fee_rate)
pub fn fee_on_net_input(amount_in: u128, fee_rate: u32) -> Result<u128> {
    if fee_rate == 0 || amount_in == 0 {
        return Ok(0);
    }
    mul_div_round_up(
        amount_in,
        fee_rate as u128,
        (FEE_RATE_DENOMINATOR - fee_rate) as u128,
    )
}

/// Calculate the protocol fee portion of total fees
pub fn calculate_protocol_fee(fee_amount: u128, protocol_fee_rate: u8) -> Result<u128> {
    if protocol_fee_rate == 0 || fee_amount == 0 {
        return Ok(0);
    }

    let numerator = fee_amount
        .checked_mul(protocol_fee_rate as u128)
        .ok_or(TidepoolError::MathOverflow)?;

    Ok(numerator / PROTOCOL_FEE_RATE_DENOMINATOR as u128)
}
