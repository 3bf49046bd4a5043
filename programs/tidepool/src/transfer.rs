//! Asset transfer collaborator
//!
//! The pool never moves tokens itself. Every inflow and outflow goes through
//! an `AssetTransfer` implementation supplied by the host, and the pool
//! re-reads balances afterwards instead of trusting the call's return.

use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::errors::TidepoolError;

pub trait AssetTransfer {
    /// Balance of `mint` held by `holder`
    fn balance_of(&self, mint: &Pubkey, holder: &Pubkey) -> u128;

    /// Move `amount` of `mint` from a payer into the pool vault
    fn pull(&mut self, mint: &Pubkey, from: &Pubkey, vault: &Pubkey, amount: u128) -> Result<()>;

    /// Move `amount` of `mint` out of the pool vault to a recipient
    fn push(&mut self, mint: &Pubkey, vault: &Pubkey, to: &Pubkey, amount: u128) -> Result<()>;
}

/// In-memory token balances keyed by (mint, holder)
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balances: HashMap<(Pubkey, Pubkey), u128>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tokens out of thin air for `holder`
    pub fn credit(&mut self, mint: &Pubkey, holder: &Pubkey, amount: u128) -> Result<()> {
        let balance = self.balances.entry((*mint, *holder)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TidepoolError::MathOverflow)?;
        Ok(())
    }

    fn move_funds(&mut self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        if amount == 0 || from == to {
            return Ok(());
        }

        let from_balance = self.balance_of(mint, from);
        require!(from_balance >= amount, TidepoolError::InsufficientBalance);
        let to_balance = self
            .balance_of(mint, to)
            .checked_add(amount)
            .ok_or(TidepoolError::MathOverflow)?;

        self.balances.insert((*mint, *from), from_balance - amount);
        self.balances.insert((*mint, *to), to_balance);
        Ok(())
    }
}

impl AssetTransfer for MemoryLedger {
    fn balance_of(&self, mint: &Pubkey, holder: &Pubkey) -> u128 {
        self.balances.get(&(*mint, *holder)).copied().unwrap_or(0)
    }

    fn pull(&mut self, mint: &Pubkey, from: &Pubkey, vault: &Pubkey, amount: u128) -> Result<()> {
        self.move_funds(mint, from, vault, amount)
    }

    fn push(&mut self, mint: &Pubkey, vault: &Pubkey, to: &Pubkey, amount: u128) -> Result<()> {
        self.move_funds(mint, vault, to, amount)
    }
}
