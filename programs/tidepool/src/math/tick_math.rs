//! Tick Math
//!
//! Converts between tick indices and sqrt prices.
//!
//! sqrt_price = sqrt(1.0001^tick), stored as Q64.64

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK};
use crate::errors::TidepoolError;
use crate::math::full_math::{to_u128, U256};
use anchor_lang::prelude::*;

/// 1/sqrt(1.0001)^(2^i) in Q128.128, one entry per bit of |tick|
const RATIO_TABLE: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

/// Get sqrt price at a given tick
/// sqrt_price_x64 = sqrt(1.0001^tick) * 2^64, rounded up
///
/// 1.0001^|tick| is the product of 1.0001^(2^i) for each bit i set in |tick|;
/// positive ticks invert the product.
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128> {
    if tick < MIN_TICK {
        return Err(TidepoolError::TickBelowMinimum.into());
    }
    if tick > MAX_TICK {
        return Err(TidepoolError::TickAboveMaximum.into());
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(RATIO_TABLE[0])
    } else {
        U256::one() << 128
    };
    for (bit, factor) in RATIO_TABLE.iter().enumerate().skip(1) {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.64, rounding up
    let rounding = if (ratio & U256::from(u64::MAX)).is_zero() { 0 } else { 1 };
    to_u128((ratio >> 64) + U256::from(rounding))
}

/// Get tick at a given sqrt price
/// Returns the greatest tick whose sqrt price is <= `sqrt_price_x64`
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32> {
    if sqrt_price_x64 < MIN_SQRT_PRICE_X64 {
        return Err(TidepoolError::SqrtPriceBelowMinimum.into());
    }
    if sqrt_price_x64 > MAX_SQRT_PRICE_X64 {
        return Err(TidepoolError::SqrtPriceAboveMaximum.into());
    }

    // Binary search over [MIN_TICK, MAX_TICK]: invariant price(low) <= target
    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    while low < high {
        let mid = low + (high - low + 1) / 2;
        if get_sqrt_price_at_tick(mid)? <= sqrt_price_x64 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    Ok(low)
}

/// Check that a root price is inside the global bounds
pub fn validate_sqrt_price(sqrt_price_x64: u128) -> Result<()> {
    require!(
        sqrt_price_x64 >= MIN_SQRT_PRICE_X64,
        TidepoolError::SqrtPriceBelowMinimum
    );
    require!(
        sqrt_price_x64 <= MAX_SQRT_PRICE_X64,
        TidepoolError::SqrtPriceAboveMaximum
    );
    Ok(())
}

/// Check if a tick is valid for the given tick spacing
pub fn is_valid_tick(tick: i32, tick_spacing: u16) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick) && tick % (tick_spacing as i32) == 0
}
