use anchor_lang::prelude::*;

use crate::errors::TidepoolError;
use crate::hooks::push_outflow;
use crate::math::liquidity_math::{get_ambient_reserves, get_amounts_for_liquidity};
use crate::math::safe_math::{safe_add, to_signed};
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::state::{LevelBook, Pool, PositionKey};
use crate::transfer::AssetTransfer;

impl Pool {
    /// Remove concentrated liquidity from `owner`'s position and pay `recipient`
    ///
    /// Pays the principal backing `liquidity` at the current price plus the
    /// rewards it earned, both rounded down. Rewards are ambient seeds, taken
    /// out of the ambient pool and paid as full-range reserves.
    pub fn burn(
        &mut self,
        owner: Pubkey,
        recipient: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
    ) -> Result<(u128, u128)> {
        self.require_initialized()?;
        self.config.validate_range(tick_lower, tick_upper)?;
        require!(liquidity > 0, TidepoolError::ZeroLiquidity);

        let key = PositionKey::new(owner, tick_lower, tick_upper);
        let held = self
            .positions
            .position(&key)
            .ok_or(TidepoolError::PositionNotFound)?
            .liquidity;
        require!(liquidity <= held, TidepoolError::PositionUnderflow);

        let mut curve = self.curve;
        let tick = curve.current_tick;
        let growth = curve.conc_growth_x64;

        let lower_edit = self
            .levels
            .remove_level_liquidity(tick_lower, tick, liquidity, false, growth)?;
        let upper_edit = self
            .levels
            .remove_level_liquidity(tick_upper, tick, liquidity, true, growth)?;

        // removal never reseeds an odometer, so the staged levels still hold the range's mileage
        let mileage = LevelBook::range_mileage(
            &lower_edit.level,
            &upper_edit.level,
            tick_lower,
            tick_upper,
            tick,
            growth,
        );
        let (position, reward_seeds) = self.positions.remove_liquidity(&key, liquidity, mileage)?;

        if curve.in_range(tick_lower, tick_upper) {
            curve.apply_conc_delta(-to_signed(liquidity)?)?;
        }

        let (base_principal, quote_principal) = get_amounts_for_liquidity(
            curve.sqrt_price_x64,
            get_sqrt_price_at_tick(tick_lower)?,
            get_sqrt_price_at_tick(tick_upper)?,
            liquidity,
            false,
        )?;

        let reward_liquidity = curve.liquidity_for_seeds(reward_seeds)?;
        curve.apply_seed_delta(-to_signed(reward_seeds)?)?;
        let (base_reward, quote_reward) =
            get_ambient_reserves(curve.sqrt_price_x64, reward_liquidity, false)?;

        let base_paid = safe_add(base_principal, base_reward)?;
        let quote_paid = safe_add(quote_principal, quote_reward)?;

        let vault = self.config.vault;
        push_outflow(transfer, &self.config.base_mint, &vault, &recipient, base_paid)?;
        push_outflow(transfer, &self.config.quote_mint, &vault, &recipient, quote_paid)?;

        self.levels.commit_edit(&mut self.tick_index, lower_edit);
        self.levels.commit_edit(&mut self.tick_index, upper_edit);
        self.positions.commit(key, position);
        self.curve = curve;

        msg!(
            "Burn [{}, {}) liquidity {} owner {}: base {} quote {} (reward seeds {})",
            tick_lower,
            tick_upper,
            liquidity,
            owner,
            base_paid,
            quote_paid,
            reward_seeds
        );

        Ok((base_paid, quote_paid))
    }
}
