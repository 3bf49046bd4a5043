//! Swap sweep
//!
//! Drives the curve engine across tick boundaries. Each pass pins the next
//! initialized tick inside the current bitmap word, sweeps the curve up to it,
//! escalates to the mezzanine tier when the word spills, and crosses the level
//! once the boundary is reached with quantity still left.

use anchor_lang::prelude::*;

use crate::constants::{MAX_TICK, MIN_TICK};
use crate::engine::curve_engine::{moves_toward, swap_to_limit, SwapAccum, SwapFrame};
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use crate::state::curve::CurveState;
use crate::state::level::LevelOverlay;
use crate::state::tick_index::TickIndex;

/// Outcome of a full sweep
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepResult {
    pub accum: SwapAccum,
    /// Levels crossed on the way
    pub crossings: u32,
}

/// Quantity remains and the price has not reached the limit
pub fn has_swap_left(
    curve: &CurveState,
    accum: &SwapAccum,
    limit_price: u128,
    is_buy: bool,
) -> bool {
    accum.qty_left > 0 && moves_toward(curve.sqrt_price_x64, limit_price, is_buy)
}

fn is_sentinel(tick: i32, is_buy: bool) -> bool {
    if is_buy {
        tick >= MAX_TICK
    } else {
        tick <= MIN_TICK
    }
}

/// Run a swap over the staged curve and level overlay
///
/// `curve` and `levels` are working copies; nothing here touches committed
/// pool state, so a failure part way through leaves the pool unchanged.
pub fn sweep_swap(
    curve: &mut CurveState,
    index: &TickIndex,
    levels: &mut LevelOverlay<'_>,
    frame: &SwapFrame,
    qty: u128,
    limit_price: u128,
) -> Result<SweepResult> {
    let is_buy = frame.is_buy;
    let mut accum = SwapAccum::new(qty);
    let mut crossings = 0u32;

    while has_swap_left(curve, &accum, limit_price, is_buy) {
        let pin = index.pin_bitmap(is_buy, curve.current_tick);
        let mut boundary = pin.tick;
        swap_to_limit(curve, &mut accum, frame, get_sqrt_price_at_tick(boundary)?, limit_price)?;

        if pin.spills && has_swap_left(curve, &accum, limit_price, is_buy) {
            // when the seek lands on the border itself this walk is a no-op
            boundary = index.seek_mezz_spill(pin.tick, is_buy);
            swap_to_limit(curve, &mut accum, frame, get_sqrt_price_at_tick(boundary)?, limit_price)?;
        }

        if !has_swap_left(curve, &accum, limit_price, is_buy) || is_sentinel(boundary, is_buy) {
            curve.current_tick = resting_tick(curve, boundary, is_buy)?;
            break;
        }

        let delta = levels.cross_level(boundary, is_buy, curve.conc_growth_x64)?;
        curve.apply_conc_delta(delta)?;
        curve.current_tick = if is_buy { boundary } else { boundary - 1 };
        crossings += 1;
    }

    Ok(SweepResult { accum, crossings })
}

/// Tick for a price the sweep stopped at without crossing `boundary`
///
/// A buy resting exactly on the boundary price stays below the uncrossed
/// level. A sell never reports a tick above the last one it crossed into.
fn resting_tick(curve: &CurveState, boundary: i32, is_buy: bool) -> Result<i32> {
    let at_price = get_tick_at_sqrt_price(curve.sqrt_price_x64)?;
    Ok(if is_buy {
        at_price.min(boundary - 1)
    } else {
        at_price.min(curve.current_tick)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64, Q64};
    use crate::state::level::LevelBook;

    fn frame(is_buy: bool) -> SwapFrame {
        SwapFrame {
            is_buy,
            in_base_qty: is_buy,
            fee_rate: 0,
            protocol_fee_rate: 0,
        }
    }

    /// Book with one range of `liquidity` over [lower, upper)
    fn book_with_range(lower: i32, upper: i32, liquidity: u128, tick: i32) -> (LevelBook, TickIndex) {
        let mut book = LevelBook::default();
        let mut index = TickIndex::default();
        let edit = book.add_level_liquidity(lower, tick, liquidity, false, 0).unwrap();
        book.commit_edit(&mut index, edit);
        let edit = book.add_level_liquidity(upper, tick, liquidity, true, 0).unwrap();
        book.commit_edit(&mut index, edit);
        (book, index)
    }

    #[test]
    fn test_no_liquidity_runs_to_limit() {
        let book = LevelBook::default();
        let index = TickIndex::default();
        let mut curve = CurveState::new(Q64).unwrap();
        let mut overlay = book.overlay();

        let limit = 2 * Q64;
        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(true), 1000, limit).unwrap();
        assert_eq!(curve.sqrt_price_x64, limit);
        assert_eq!(result.accum.qty_left, 1000);
        assert_eq!(result.crossings, 0);
        assert_eq!(curve.current_tick, get_tick_at_sqrt_price(limit).unwrap());
    }

    #[test]
    fn test_buy_crosses_into_range() {
        // range above the price, reached through empty words
        let (book, index) = book_with_range(1000, 2000, 1_000_000, 0);
        let mut curve = CurveState::new(Q64).unwrap();
        let mut overlay = book.overlay();

        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(true), 100, MAX_SQRT_PRICE_X64).unwrap();
        assert_eq!(result.crossings, 1);
        assert_eq!(result.accum.qty_left, 0);
        assert_eq!(result.accum.paid_base, 100);
        assert_eq!(curve.conc_liquidity, 1_000_000);
        assert!(curve.sqrt_price_x64 > get_sqrt_price_at_tick(1000).unwrap());
        assert_eq!(curve.current_tick, get_tick_at_sqrt_price(curve.sqrt_price_x64).unwrap());
        assert!(curve.current_tick >= 1000 && curve.current_tick < 2000);
        assert_eq!(overlay.crossed(), 1);
    }

    #[test]
    fn test_sell_crosses_out_of_range() {
        let (book, index) = book_with_range(-500, 500, 1_000_000, 0);
        let mut curve = CurveState::new(Q64).unwrap();
        curve.conc_liquidity = 1_000_000;
        let mut overlay = book.overlay();

        // enough quote to push through the lower boundary
        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(false), 100_000, MIN_SQRT_PRICE_X64).unwrap();
        assert_eq!(result.crossings, 1);
        assert_eq!(curve.conc_liquidity, 0);
        // nothing below the range: price runs to the limit with quantity left
        assert_eq!(curve.sqrt_price_x64, MIN_SQRT_PRICE_X64);
        assert!(result.accum.qty_left > 0);
        assert_eq!(curve.current_tick, MIN_TICK);
    }

    #[test]
    fn test_limit_before_boundary_never_crosses() {
        let (book, index) = book_with_range(0, 100, 1_000_000, 0);
        let mut curve = CurveState::new(Q64).unwrap();
        curve.conc_liquidity = 1_000_000;
        let mut overlay = book.overlay();

        let limit = get_sqrt_price_at_tick(50).unwrap();
        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(true), 1_000_000, limit).unwrap();
        assert_eq!(result.crossings, 0);
        assert_eq!(overlay.crossed(), 0);
        assert_eq!(curve.sqrt_price_x64, limit);
        assert!(result.accum.qty_left > 0);
        assert_eq!(curve.current_tick, 50);
    }

    #[test]
    fn test_exhausted_on_boundary_rests_below_it() {
        let (book, index) = book_with_range(0, 100, 1_000_000, 0);
        let mut curve = CurveState::new(Q64).unwrap();
        curve.conc_liquidity = 1_000_000;
        let mut overlay = book.overlay();

        // exactly the base needed to reach tick 100
        let upper = get_sqrt_price_at_tick(100).unwrap();
        let needed = crate::math::liquidity_math::get_base_delta(Q64, upper, 1_000_000, true).unwrap();
        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(true), needed, MAX_SQRT_PRICE_X64).unwrap();
        assert_eq!(result.accum.qty_left, 0);
        assert_eq!(curve.sqrt_price_x64, upper);
        assert_eq!(result.crossings, 0);
        assert_eq!(curve.current_tick, 99);
        assert_eq!(curve.conc_liquidity, 1_000_000);
    }

    #[test]
    fn test_buy_finds_level_on_word_border() {
        // tick 256 is the first tick of word 1, the border a spill from word 0 lands on
        let (book, index) = book_with_range(256, 300, 1_000_000, 10);
        let mut curve = CurveState::new(get_sqrt_price_at_tick(10).unwrap()).unwrap();
        let mut overlay = book.overlay();

        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(true), 10, MAX_SQRT_PRICE_X64).unwrap();
        assert_eq!(result.crossings, 1);
        assert_eq!(curve.conc_liquidity, 1_000_000);
        assert_eq!(curve.current_tick, 256);
        assert_eq!(result.accum.qty_left, 0);
    }

    #[test]
    fn test_grown_ambient_reference_buy() {
        // 6M seeds at growth 0.75 plus 10M concentrated: L = 20.5M at root 1.5
        let start = 3 * Q64 / 2;
        let mut curve = CurveState {
            sqrt_price_x64: start,
            current_tick: get_tick_at_sqrt_price(start).unwrap(),
            ambient_seeds: 6_000_000,
            conc_liquidity: 10_000_000,
            ambient_growth_x64: 3 * Q64 / 4,
            conc_growth_x64: 0,
        };
        assert_eq!(curve.ambient_liquidity().unwrap(), 10_500_000);
        assert_eq!(curve.active_liquidity().unwrap(), 20_500_000);

        let book = LevelBook::default();
        let index = TickIndex::default();
        let mut overlay = book.overlay();
        let result = sweep_swap(&mut curve, &index, &mut overlay, &frame(true), 1_000_000, MAX_SQRT_PRICE_X64).unwrap();

        assert_eq!(result.accum.qty_left, 0);
        assert_eq!(result.accum.paid_base, 1_000_000);
        assert!((-430_446..=-430_440).contains(&result.accum.paid_quote), "{}", result.accum.paid_quote);
        assert_eq!(result.crossings, 0);

        let root = crate::utils::sqrt_price_to_f64(curve.sqrt_price_x64);
        assert!((root - 1.548_780_487_8).abs() < 1e-6, "{}", root);
        assert_eq!(curve.ambient_growth_x64, 3 * Q64 / 4);
        assert_eq!(curve.ambient_seeds, 6_000_000);
        assert_eq!(curve.conc_liquidity, 10_000_000);
        assert_eq!(curve.conc_growth_x64, 0);
        assert_eq!(curve.current_tick, get_tick_at_sqrt_price(curve.sqrt_price_x64).unwrap());
    }
}
