//! Hook Caller
//!
//! Runs settlement hooks and pushes payouts, checking vault and recipient
//! balances around each call.

use anchor_lang::prelude::*;

use super::*;
use crate::errors::TidepoolError;

/// Invoke the settlement hook and verify the vault received what is owed
///
/// Each owed amount is a floor: a hook that delivers less fails with
/// `SettlementShortfall`, one that delivers more leaves the surplus in the
/// vault. The surplus is not credited to any position or to the protocol.
pub fn settle_inflow(
    transfer: &mut dyn AssetTransfer,
    hook: &mut dyn SettlementHook,
    request: &SettlementRequest,
    payload: &[u8],
) -> Result<()> {
    if request.is_empty() {
        return Ok(());
    }

    let base_before = transfer.balance_of(&request.base_mint, &request.vault);
    let quote_before = transfer.balance_of(&request.quote_mint, &request.vault);

    hook.settle(transfer, request, payload)?;

    let base_received = transfer
        .balance_of(&request.base_mint, &request.vault)
        .saturating_sub(base_before);
    let quote_received = transfer
        .balance_of(&request.quote_mint, &request.vault)
        .saturating_sub(quote_before);

    require!(
        base_received >= request.base_owed && quote_received >= request.quote_owed,
        TidepoolError::SettlementShortfall
    );
    Ok(())
}

/// Pay `amount` of `mint` out of the vault and confirm the recipient got it
pub fn push_outflow(
    transfer: &mut dyn AssetTransfer,
    mint: &Pubkey,
    vault: &Pubkey,
    recipient: &Pubkey,
    amount: u128,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let before = transfer.balance_of(mint, recipient);
    transfer.push(mint, vault, recipient, amount)?;
    let after = transfer.balance_of(mint, recipient);

    require!(
        after.checked_sub(before) == Some(amount),
        TidepoolError::TransferFailed
    );
    Ok(())
}
