use anchor_lang::prelude::*;

use crate::constants::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use crate::engine::{moves_toward, sweep_swap, SwapFrame};
use crate::errors::TidepoolError;
use crate::hooks::{push_outflow, settle_inflow, SettlementHook, SettlementRequest};
use crate::state::Pool;
use crate::transfer::AssetTransfer;

/// Swap parameters
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// Pay base, receive quote, price up. Otherwise the reverse.
    pub is_buy: bool,

    /// `qty` is denominated in base (otherwise quote)
    pub in_base_qty: bool,

    /// Quantity to fill, input side for exact-in, output side for exact-out
    pub qty: u128,

    /// Price the swap may not move past (Q64.64)
    pub limit_sqrt_price_x64: u128,
}

impl Pool {
    /// Execute a swap and return the signed (base, quote) flows
    ///
    /// Positive flows were paid in through `hook`, negative flows were paid
    /// out to `recipient`. A swap that hits its limit returns a partial fill.
    pub fn swap(
        &mut self,
        recipient: Pubkey,
        params: SwapParams,
        transfer: &mut dyn AssetTransfer,
        hook: &mut dyn SettlementHook,
        payload: &[u8],
    ) -> Result<(i128, i128)> {
        self.require_initialized()?;
        require!(params.qty > 0, TidepoolError::ZeroSwapAmount);
        require!(
            params.limit_sqrt_price_x64 >= MIN_SQRT_PRICE_X64
                && params.limit_sqrt_price_x64 <= MAX_SQRT_PRICE_X64,
            TidepoolError::InvalidPriceLimit
        );

        if !moves_toward(self.curve.sqrt_price_x64, params.limit_sqrt_price_x64, params.is_buy) {
            msg!("Swap limit {} already reached", params.limit_sqrt_price_x64);
            return Ok((0, 0));
        }

        let frame = SwapFrame {
            is_buy: params.is_buy,
            in_base_qty: params.in_base_qty,
            fee_rate: self.config.fee_rate,
            protocol_fee_rate: self.config.protocol_fee_rate,
        };

        let mut curve = self.curve;
        let mut overlay = self.levels.overlay();
        let result = sweep_swap(
            &mut curve,
            &self.tick_index,
            &mut overlay,
            &frame,
            params.qty,
            params.limit_sqrt_price_x64,
        )?;
        let crossed = overlay.into_dirty();

        let accum = result.accum;
        let mut protocol = self.protocol;
        protocol.accumulate(accum.paid_proto, params.is_buy)?;

        let request = SettlementRequest {
            base_mint: self.config.base_mint,
            quote_mint: self.config.quote_mint,
            vault: self.config.vault,
            base_owed: accum.paid_base.max(0) as u128,
            quote_owed: accum.paid_quote.max(0) as u128,
        };
        settle_inflow(transfer, hook, &request, payload)?;

        let vault = self.config.vault;
        if accum.paid_base < 0 {
            push_outflow(transfer, &self.config.base_mint, &vault, &recipient, accum.paid_base.unsigned_abs())?;
        }
        if accum.paid_quote < 0 {
            push_outflow(transfer, &self.config.quote_mint, &vault, &recipient, accum.paid_quote.unsigned_abs())?;
        }

        self.curve = curve;
        self.levels.commit_overlay(crossed);
        self.protocol = protocol;

        msg!(
            "Swap {}: base {} quote {} protocol {} crossings {} price {} tick {}",
            if params.is_buy { "buy" } else { "sell" },
            accum.paid_base,
            accum.paid_quote,
            accum.paid_proto,
            result.crossings,
            curve.sqrt_price_x64,
            curve.current_tick
        );

        Ok((accum.paid_base, accum.paid_quote))
    }
}
