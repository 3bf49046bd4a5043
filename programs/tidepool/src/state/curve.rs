use anchor_lang::prelude::*;

use crate::constants::Q64;
use crate::math::full_math::{mul_div, mul_q64};
use crate::math::safe_math::{add_liquidity_delta, safe_add};
use crate::math::tick_math::{get_tick_at_sqrt_price, validate_sqrt_price};

/// Instantaneous state of the liquidity curve
///
/// Ambient liquidity is stored as seeds that inflate with `ambient_growth_x64`:
/// active ambient liquidity = ambient_seeds * (1 + ambient_growth).
/// Concentrated liquidity is the sum of all ranged positions whose range
/// contains `current_tick`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurveState {
    /// Current sqrt price (Q64.64), base per quote
    pub sqrt_price_x64: u128,

    /// Tick tracked alongside the price, updated directly on crossings
    pub current_tick: i32,

    /// Ambient liquidity in seed units
    pub ambient_seeds: u128,

    /// Liquidity from ranged positions active at the current tick
    pub conc_liquidity: u128,

    /// Cumulative ambient growth per seed (Q64.64)
    pub ambient_growth_x64: u128,

    /// Cumulative rewards per unit of concentrated liquidity,
    /// in ambient seeds (Q64.64)
    pub conc_growth_x64: u128,
}

impl CurveState {
    /// Fresh curve at a starting price with no liquidity
    pub fn new(sqrt_price_x64: u128) -> Result<Self> {
        validate_sqrt_price(sqrt_price_x64)?;
        Ok(Self {
            sqrt_price_x64,
            current_tick: get_tick_at_sqrt_price(sqrt_price_x64)?,
            ..Default::default()
        })
    }

    /// 1 + ambient_growth in Q64.64
    pub fn ambient_multiplier_x64(&self) -> Result<u128> {
        safe_add(Q64, self.ambient_growth_x64)
    }

    /// Liquidity represented by a seed quantity, rounded down
    pub fn liquidity_for_seeds(&self, seeds: u128) -> Result<u128> {
        mul_q64(seeds, self.ambient_multiplier_x64()?)
    }

    /// Seeds representing a liquidity quantity, rounded down
    pub fn seeds_for_liquidity(&self, liquidity: u128) -> Result<u128> {
        mul_div(liquidity, Q64, self.ambient_multiplier_x64()?)
    }

    pub fn ambient_liquidity(&self) -> Result<u128> {
        self.liquidity_for_seeds(self.ambient_seeds)
    }

    /// Total liquidity the curve trades against at the current price
    pub fn active_liquidity(&self) -> Result<u128> {
        safe_add(self.ambient_liquidity()?, self.conc_liquidity)
    }

    /// Apply a signed delta to concentrated liquidity, never below zero
    pub fn apply_conc_delta(&mut self, delta: i128) -> Result<()> {
        self.conc_liquidity = add_liquidity_delta(self.conc_liquidity, delta)?;
        Ok(())
    }

    /// Apply a signed delta to the ambient seed pool, never below zero
    pub fn apply_seed_delta(&mut self, delta: i128) -> Result<()> {
        self.ambient_seeds = add_liquidity_delta(self.ambient_seeds, delta)?;
        Ok(())
    }

    /// Whether a range [lower, upper) contains the current tick
    pub fn in_range(&self, tick_lower: i32, tick_upper: i32) -> bool {
        tick_lower <= self.current_tick && self.current_tick < tick_upper
    }
}
