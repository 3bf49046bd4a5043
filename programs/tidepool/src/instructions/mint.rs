use anchor_lang::prelude::*;

use crate::errors::TidepoolError;
use crate::hooks::{settle_inflow, SettlementHook, SettlementRequest};
use crate::math::liquidity_math::get_amounts_for_liquidity;
use crate::math::safe_math::to_signed;
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::state::{LevelBook, Pool, PositionKey};
use crate::transfer::AssetTransfer;

impl Pool {
    /// Add concentrated liquidity to `owner`'s position over [tick_lower, tick_upper)
    ///
    /// Returns the (base, quote) owed, rounded up. The hook must deliver both
    /// before anything is written back.
    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &mut self,
        owner: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
        hook: &mut dyn SettlementHook,
        payload: &[u8],
    ) -> Result<(u128, u128)> {
        self.require_initialized()?;
        self.config.validate_range(tick_lower, tick_upper)?;
        require!(liquidity > 0, TidepoolError::ZeroLiquidity);

        let mut curve = self.curve;
        let tick = curve.current_tick;
        let growth = curve.conc_growth_x64;

        let lower_edit = self
            .levels
            .add_level_liquidity(tick_lower, tick, liquidity, false, growth)?;
        let upper_edit = self
            .levels
            .add_level_liquidity(tick_upper, tick, liquidity, true, growth)?;

        let mileage = LevelBook::range_mileage(
            &lower_edit.level,
            &upper_edit.level,
            tick_lower,
            tick_upper,
            tick,
            growth,
        );
        let key = PositionKey::new(owner, tick_lower, tick_upper);
        let position = self.positions.add_liquidity(&key, liquidity, mileage)?;

        if curve.in_range(tick_lower, tick_upper) {
            curve.apply_conc_delta(to_signed(liquidity)?)?;
        }

        let (base_owed, quote_owed) = get_amounts_for_liquidity(
            curve.sqrt_price_x64,
            get_sqrt_price_at_tick(tick_lower)?,
            get_sqrt_price_at_tick(tick_upper)?,
            liquidity,
            true,
        )?;

        let request = SettlementRequest {
            base_mint: self.config.base_mint,
            quote_mint: self.config.quote_mint,
            vault: self.config.vault,
            base_owed,
            quote_owed,
        };
        settle_inflow(transfer, hook, &request, payload)?;

        self.levels.commit_edit(&mut self.tick_index, lower_edit);
        self.levels.commit_edit(&mut self.tick_index, upper_edit);
        self.positions.commit(key, position);
        self.curve = curve;

        msg!(
            "Mint [{}, {}) liquidity {} owner {}: base {} quote {}",
            tick_lower,
            tick_upper,
            liquidity,
            owner,
            base_owed,
            quote_owed
        );

        Ok((base_owed, quote_owed))
    }
}
