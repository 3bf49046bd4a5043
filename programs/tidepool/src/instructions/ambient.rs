//! Full-range liquidity held as ambient seeds

use anchor_lang::prelude::*;

use crate::errors::TidepoolError;
use crate::hooks::{push_outflow, settle_inflow, SettlementHook, SettlementRequest};
use crate::math::liquidity_math::get_ambient_reserves;
use crate::math::safe_math::to_signed;
use crate::state::Pool;
use crate::transfer::AssetTransfer;

impl Pool {
    /// Add `liquidity` of full-range liquidity for `owner`
    ///
    /// The owner receives floor(liquidity / (1 + ambient growth)) seeds and
    /// owes the reserves backing the full `liquidity`, rounded up.
    pub fn mint_ambient(
        &mut self,
        owner: Pubkey,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
        hook: &mut dyn SettlementHook,
        payload: &[u8],
    ) -> Result<(u128, u128)> {
        self.require_initialized()?;

        let mut curve = self.curve;
        let seeds = curve.seeds_for_liquidity(liquidity)?;
        require!(seeds > 0, TidepoolError::ZeroLiquidity);

        let balance = self.positions.add_ambient(&owner, seeds)?;
        curve.apply_seed_delta(to_signed(seeds)?)?;

        let (base_owed, quote_owed) = get_ambient_reserves(curve.sqrt_price_x64, liquidity, true)?;
        let request = SettlementRequest {
            base_mint: self.config.base_mint,
            quote_mint: self.config.quote_mint,
            vault: self.config.vault,
            base_owed,
            quote_owed,
        };
        settle_inflow(transfer, hook, &request, payload)?;

        self.positions.commit_ambient(owner, balance);
        self.curve = curve;

        msg!(
            "Ambient mint liquidity {} ({} seeds) owner {}: base {} quote {}",
            liquidity,
            seeds,
            owner,
            base_owed,
            quote_owed
        );

        Ok((base_owed, quote_owed))
    }

    /// Remove `liquidity` of full-range liquidity from `owner` and pay `recipient`
    ///
    /// Burns floor(liquidity / (1 + ambient growth)) seeds and pays the
    /// reserves of what those seeds are worth, rounded down.
    pub fn burn_ambient(
        &mut self,
        owner: Pubkey,
        recipient: Pubkey,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
    ) -> Result<(u128, u128)> {
        self.require_initialized()?;

        let mut curve = self.curve;
        let seeds = curve.seeds_for_liquidity(liquidity)?;
        require!(seeds > 0, TidepoolError::ZeroLiquidity);

        let balance = self.positions.remove_ambient(&owner, seeds)?;
        let released = curve.liquidity_for_seeds(seeds)?;
        curve.apply_seed_delta(-to_signed(seeds)?)?;

        let (base_paid, quote_paid) = get_ambient_reserves(curve.sqrt_price_x64, released, false)?;

        let vault = self.config.vault;
        push_outflow(transfer, &self.config.base_mint, &vault, &recipient, base_paid)?;
        push_outflow(transfer, &self.config.quote_mint, &vault, &recipient, quote_paid)?;

        self.positions.commit_ambient(owner, balance);
        self.curve = curve;

        msg!(
            "Ambient burn liquidity {} ({} seeds) owner {}: base {} quote {}",
            released,
            seeds,
            owner,
            base_paid,
            quote_paid
        );

        Ok((base_paid, quote_paid))
    }
}
