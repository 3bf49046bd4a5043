//! Curve Engine
//!
//! Executes a swap against the locally uniform constant-product curve: the
//! segment between the current price and the next boundary, over which active
//! liquidity does not change.

use anchor_lang::prelude::*;

use crate::constants::Q64;
use crate::math::full_math::{mul_div, mul_div_round_up, mul_q64, sqrt_ratio_q64};
use crate::math::liquidity_math::get_ambient_reserves;
use crate::math::safe_math::{safe_add, safe_sub, to_signed};
use crate::math::sqrt_price_math::get_next_sqrt_price_from_output;
use crate::math::swap_math::{
    amount_less_fee, calculate_protocol_fee, compute_swap_step, fee_on_net_input,
    input_to_target, output_to_target,
};
use crate::state::curve::CurveState;

/// Immutable parameters of one swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapFrame {
    /// Paying base for quote, price increasing
    pub is_buy: bool,
    /// The requested quantity is denominated in base
    pub in_base_qty: bool,
    /// Fee rate in parts per million of gross input
    pub fee_rate: u32,
    /// Protocol cut as a percentage of the fee
    pub protocol_fee_rate: u8,
}

impl SwapFrame {
    /// The quantity names the input side: base for buys, quote for sells
    pub fn exact_input(&self) -> bool {
        self.is_buy == self.in_base_qty
    }
}

/// Running totals of one swap
///
/// Flows are signed from the pool's side: positive is paid in by the
/// trader, negative is paid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapAccum {
    /// Quantity still to fill, in the frame's quantity asset
    pub qty_left: u128,
    pub paid_base: i128,
    pub paid_quote: i128,
    /// Protocol skim, denominated in the input asset
    pub paid_proto: u128,
}

impl SwapAccum {
    pub fn new(qty: u128) -> Self {
        Self {
            qty_left: qty,
            ..Default::default()
        }
    }
}

/// Whether the price still has room to move toward `target` in the swap direction
pub fn moves_toward(sqrt_price_x64: u128, target_x64: u128, is_buy: bool) -> bool {
    if is_buy {
        sqrt_price_x64 < target_x64
    } else {
        sqrt_price_x64 > target_x64
    }
}

/// Swap against the curve up to the nearer of `bump_price` and `limit_price`
///
/// Charges the fee on the input side, skims the protocol cut into
/// `accum.paid_proto` and assimilates the rest into curve liquidity before
/// rolling the remaining quantity along the curve. Stops early only when the
/// quantity is exhausted. With no active liquidity the price jumps straight
/// to the target and no quantity is consumed.
pub fn swap_to_limit(
    curve: &mut CurveState,
    accum: &mut SwapAccum,
    frame: &SwapFrame,
    bump_price: u128,
    limit_price: u128,
) -> Result<()> {
    let is_buy = frame.is_buy;
    let target = if is_buy {
        bump_price.min(limit_price)
    } else {
        bump_price.max(limit_price)
    };

    if accum.qty_left == 0 || !moves_toward(curve.sqrt_price_x64, target, is_buy) {
        return Ok(());
    }

    let liquidity = curve.active_liquidity()?;
    if liquidity == 0 {
        curve.sqrt_price_x64 = target;
        return Ok(());
    }

    let exact_input = frame.exact_input();
    let fee = step_fee(curve.sqrt_price_x64, target, liquidity, accum.qty_left, frame)?;
    let proto = calculate_protocol_fee(fee, frame.protocol_fee_rate)?;
    assimilate_fees(curve, fee - proto, is_buy, target)?;

    // roll what is left of the budget from the shifted price
    let budget = if exact_input {
        safe_sub(accum.qty_left, fee)?
    } else {
        accum.qty_left
    };
    let step = compute_swap_step(
        curve.sqrt_price_x64,
        target,
        curve.active_liquidity()?,
        budget,
        exact_input,
        is_buy,
    )?;
    curve.sqrt_price_x64 = step.sqrt_price_next_x64;

    let paid_in = safe_add(step.amount_in, fee)?;
    accum.qty_left = if exact_input {
        safe_sub(accum.qty_left, paid_in)?
    } else {
        safe_sub(accum.qty_left, step.amount_out)?
    };

    let inflow = to_signed(paid_in)?;
    let outflow = to_signed(step.amount_out)?;
    if is_buy {
        accum.paid_base = safe_add(accum.paid_base, inflow)?;
        accum.paid_quote = safe_sub(accum.paid_quote, outflow)?;
    } else {
        accum.paid_quote = safe_add(accum.paid_quote, inflow)?;
        accum.paid_base = safe_sub(accum.paid_base, outflow)?;
    }
    accum.paid_proto = safe_add(accum.paid_proto, proto)?;

    Ok(())
}

/// Fee owed on the input side of a step
///
/// Exact input: the fee on the net input needed to reach the target, or the
/// whole fee share of the budget when the budget falls short.
/// Exact output: the fee on the input needed to release the wanted output.
fn step_fee(
    sqrt_price_x64: u128,
    target: u128,
    liquidity: u128,
    qty_left: u128,
    frame: &SwapFrame,
) -> Result<u128> {
    if frame.fee_rate == 0 {
        return Ok(0);
    }

    if frame.exact_input() {
        let net_avail = amount_less_fee(qty_left, frame.fee_rate)?;
        let needed = input_to_target(sqrt_price_x64, target, liquidity, frame.is_buy)?;
        if net_avail >= needed {
            fee_on_net_input(needed, frame.fee_rate)
        } else {
            safe_sub(qty_left, net_avail)
        }
    } else {
        let available = output_to_target(sqrt_price_x64, target, liquidity, frame.is_buy)?;
        let end = if qty_left >= available {
            target
        } else {
            get_next_sqrt_price_from_output(sqrt_price_x64, liquidity, qty_left, frame.is_buy)?
        };
        let needed = input_to_target(sqrt_price_x64, end, liquidity, frame.is_buy)?;
        fee_on_net_input(needed, frame.fee_rate)
    }
}

/// Fold liquidity fees paid in one asset into the curve
///
/// The fee joins that asset's virtual reserve, so liquidity inflates by
/// k = sqrt(1 + fee / reserve) and the price shifts by k toward the fee side
/// (up for base, down for quote), never past `target`. The inflation is
/// credited pro-rata: ambient seeds through `ambient_growth_x64`, and the
/// concentrated share as fresh ambient seeds tracked by `conc_growth_x64`.
pub fn assimilate_fees(
    curve: &mut CurveState,
    fee: u128,
    in_base: bool,
    target: u128,
) -> Result<()> {
    if fee == 0 {
        return Ok(());
    }
    let liquidity = curve.active_liquidity()?;
    if liquidity == 0 {
        return Ok(());
    }

    let (base_reserve, quote_reserve) =
        get_ambient_reserves(curve.sqrt_price_x64, liquidity, false)?;
    let reserve = if in_base { base_reserve } else { quote_reserve };
    if reserve == 0 {
        return Ok(());
    }

    let inflator = sqrt_ratio_q64(safe_add(reserve, fee)?, reserve)?;
    if inflator <= Q64 {
        return Ok(());
    }

    let inflated = mul_q64(liquidity, inflator)?;
    curve.sqrt_price_x64 = if in_base {
        mul_q64(curve.sqrt_price_x64, inflator)?.min(target)
    } else {
        mul_div_round_up(curve.sqrt_price_x64, Q64, inflator)?.max(target)
    };

    credit_growth(curve, liquidity, safe_sub(inflated, liquidity)?)
}

fn credit_growth(curve: &mut CurveState, liquidity: u128, inflation: u128) -> Result<()> {
    if inflation == 0 {
        return Ok(());
    }

    // every unit of liquidity grows by inflation / liquidity
    let growth = mul_div(inflation, curve.ambient_multiplier_x64()?, liquidity)?;
    curve.ambient_growth_x64 = safe_add(curve.ambient_growth_x64, growth)?;

    if curve.conc_liquidity > 0 {
        let conc_share = mul_div(inflation, curve.conc_liquidity, liquidity)?;
        let seeds = curve.seeds_for_liquidity(conc_share)?;
        curve.ambient_seeds = safe_add(curve.ambient_seeds, seeds)?;
        let mileage = mul_div(seeds, Q64, curve.conc_liquidity)?;
        curve.conc_growth_x64 = safe_add(curve.conc_growth_x64, mileage)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve_at(sqrt_price_x64: u128, ambient_seeds: u128, conc_liquidity: u128) -> CurveState {
        CurveState {
            sqrt_price_x64,
            current_tick: 0,
            ambient_seeds,
            conc_liquidity,
            ambient_growth_x64: 0,
            conc_growth_x64: 0,
        }
    }

    fn buy_frame(fee_rate: u32, protocol_fee_rate: u8) -> SwapFrame {
        SwapFrame {
            is_buy: true,
            in_base_qty: true,
            fee_rate,
            protocol_fee_rate,
        }
    }

    #[test]
    fn test_zero_fee_exact_input_consumes_all() {
        let mut curve = curve_at(Q64, 0, 1000);
        let mut accum = SwapAccum::new(100);
        swap_to_limit(&mut curve, &mut accum, &buy_frame(0, 0), 4 * Q64, 4 * Q64).unwrap();

        assert_eq!(accum.qty_left, 0);
        assert_eq!(accum.paid_base, 100);
        assert_eq!(accum.paid_quote, -90);
        assert_eq!(curve.sqrt_price_x64, Q64 + Q64 / 10);
    }

    #[test]
    fn test_stops_at_nearer_of_bump_and_limit() {
        let mut curve = curve_at(Q64, 0, 1000);
        let mut accum = SwapAccum::new(10_000);
        swap_to_limit(&mut curve, &mut accum, &buy_frame(0, 0), 2 * Q64, 3 * Q64).unwrap();

        assert_eq!(curve.sqrt_price_x64, 2 * Q64);
        assert_eq!(accum.paid_base, 1000);
        assert_eq!(accum.paid_quote, -500);
        assert_eq!(accum.qty_left, 9000);
    }

    #[test]
    fn test_zero_liquidity_jumps_without_consuming() {
        let mut curve = curve_at(Q64, 0, 0);
        let mut accum = SwapAccum::new(500);
        swap_to_limit(&mut curve, &mut accum, &buy_frame(3000, 10), 2 * Q64, 3 * Q64).unwrap();

        assert_eq!(curve.sqrt_price_x64, 2 * Q64);
        assert_eq!(accum, SwapAccum::new(500));
    }

    #[test]
    fn test_target_behind_price_is_noop() {
        let mut curve = curve_at(2 * Q64, 0, 1000);
        let before = curve;
        let mut accum = SwapAccum::new(500);
        swap_to_limit(&mut curve, &mut accum, &buy_frame(0, 0), 3 * Q64, Q64).unwrap();
        assert_eq!(curve, before);
        assert_eq!(accum.qty_left, 500);
    }

    #[test]
    fn test_exact_output_sell() {
        // sell quote for exactly 250 base
        let mut curve = curve_at(2 * Q64, 0, 1000);
        let mut accum = SwapAccum::new(250);
        let frame = SwapFrame {
            is_buy: false,
            in_base_qty: true,
            fee_rate: 0,
            protocol_fee_rate: 0,
        };
        assert!(!frame.exact_input());
        swap_to_limit(&mut curve, &mut accum, &frame, Q64, Q64).unwrap();

        assert_eq!(accum.qty_left, 0);
        assert_eq!(accum.paid_base, -250);
        assert_eq!(accum.paid_quote, 72);
    }

    #[test]
    fn test_fee_splits_between_protocol_and_growth() {
        let mut curve = curve_at(Q64, 1_000_000, 1_000_000);
        let mut accum = SwapAccum::new(10_000);
        // 1% fee, 20% protocol cut
        swap_to_limit(&mut curve, &mut accum, &buy_frame(10_000, 20), 2 * Q64, 2 * Q64).unwrap();

        assert_eq!(accum.qty_left, 0);
        assert_eq!(accum.paid_base, 10_000);
        assert_eq!(accum.paid_proto, 20);
        assert!(curve.ambient_growth_x64 > 0);
        assert!(curve.conc_growth_x64 > 0);
        // concentrated share became ambient seeds
        assert!(curve.ambient_seeds > 1_000_000);
    }

    #[test]
    fn test_assimilation_inflates_liquidity() {
        let mut curve = curve_at(Q64, 2_000_000, 0);
        // 2M base reserve, fee of 4004 gives k ~ 1.001
        assimilate_fees(&mut curve, 4004, true, 2 * Q64).unwrap();

        let grown = curve.active_liquidity().unwrap();
        assert!(grown > 2_001_990 && grown <= 2_002_001);
        let price = curve.sqrt_price_x64 as f64 / Q64 as f64;
        assert!((price - 1.001).abs() < 1e-6);
        // growth per seed matches the inflation
        let growth = curve.ambient_growth_x64 as f64 / Q64 as f64;
        assert!((growth - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_assimilation_clamped_to_target() {
        let mut curve = curve_at(Q64, 1000, 0);
        assimilate_fees(&mut curve, 1_000_000, true, Q64 + 1).unwrap();
        assert_eq!(curve.sqrt_price_x64, Q64 + 1);

        let mut curve = curve_at(Q64, 1000, 0);
        assimilate_fees(&mut curve, 1_000_000, false, Q64 - 1).unwrap();
        assert_eq!(curve.sqrt_price_x64, Q64 - 1);
    }
}
