//! Settlement Hooks
//!
//! Mints and swaps that leave the caller owing tokens hand control to a
//! caller-supplied hook. The hook receives the obligation and an opaque
//! payload and must get the tokens into the vault before it returns. The
//! pool verifies by balance delta, never by the hook's return value.

use anchor_lang::prelude::*;

use crate::transfer::AssetTransfer;

pub mod hook_caller;

pub use hook_caller::*;

/// Tokens the caller owes the pool vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementRequest {
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub vault: Pubkey,
    pub base_owed: u128,
    pub quote_owed: u128,
}

impl SettlementRequest {
    pub fn is_empty(&self) -> bool {
        self.base_owed == 0 && self.quote_owed == 0
    }
}

pub trait SettlementHook {
    /// Deliver at least the owed amounts to `request.vault`
    fn settle(
        &mut self,
        transfer: &mut dyn AssetTransfer,
        request: &SettlementRequest,
        payload: &[u8],
    ) -> Result<()>;
}

/// Hook that pulls the owed amounts straight from a payer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectPull {
    pub payer: Pubkey,
}

impl DirectPull {
    pub fn new(payer: Pubkey) -> Self {
        Self { payer }
    }
}

impl SettlementHook for DirectPull {
    fn settle(
        &mut self,
        transfer: &mut dyn AssetTransfer,
        request: &SettlementRequest,
        _payload: &[u8],
    ) -> Result<()> {
        if request.base_owed > 0 {
            transfer.pull(&request.base_mint, &self.payer, &request.vault, request.base_owed)?;
        }
        if request.quote_owed > 0 {
            transfer.pull(&request.quote_mint, &self.payer, &request.vault, request.quote_owed)?;
        }
        Ok(())
    }
}
