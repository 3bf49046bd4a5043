//! Single-writer access to a pool
//!
//! Every operation takes the pool's lock with `try_lock`. A second entrant,
//! including a settlement hook calling back into the same pool, fails with
//! `Reentrancy` instead of waiting.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use anchor_lang::prelude::*;

use crate::errors::TidepoolError;
use crate::hooks::SettlementHook;
use crate::instructions::SwapParams;
use crate::state::{CurveState, Pool, PoolConfig, RangePosition};
use crate::transfer::AssetTransfer;

#[derive(Clone, Debug)]
pub struct SharedPool {
    inner: Arc<Mutex<Pool>>,
}

impl SharedPool {
    pub fn new(config: PoolConfig) -> Result<Self> {
        Ok(Self::from_pool(Pool::new(config)?))
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Pool>> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(guard),
            // operations only write back after every fallible step, so a
            // panicked holder never left a partial commit behind
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(TidepoolError::Reentrancy.into()),
        }
    }

    /// Run `f` with exclusive access to the pool
    pub fn with_pool<T>(&self, f: impl FnOnce(&mut Pool) -> Result<T>) -> Result<T> {
        let mut pool = self.lock()?;
        f(&mut pool)
    }

    pub fn initialize(&self, initial_sqrt_price_x64: u128) -> Result<()> {
        self.lock()?.initialize(initial_sqrt_price_x64)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn mint(
        &self,
        owner: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
        hook: &mut dyn SettlementHook,
        payload: &[u8],
    ) -> Result<(u128, u128)> {
        self.lock()?
            .mint(owner, tick_lower, tick_upper, liquidity, transfer, hook, payload)
    }

    pub fn burn(
        &self,
        owner: Pubkey,
        recipient: Pubkey,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
    ) -> Result<(u128, u128)> {
        self.lock()?
            .burn(owner, recipient, tick_lower, tick_upper, liquidity, transfer)
    }

    pub fn mint_ambient(
        &self,
        owner: Pubkey,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
        hook: &mut dyn SettlementHook,
        payload: &[u8],
    ) -> Result<(u128, u128)> {
        self.lock()?
            .mint_ambient(owner, liquidity, transfer, hook, payload)
    }

    pub fn burn_ambient(
        &self,
        owner: Pubkey,
        recipient: Pubkey,
        liquidity: u128,
        transfer: &mut dyn AssetTransfer,
    ) -> Result<(u128, u128)> {
        self.lock()?
            .burn_ambient(owner, recipient, liquidity, transfer)
    }

    pub fn swap(
        &self,
        recipient: Pubkey,
        params: SwapParams,
        transfer: &mut dyn AssetTransfer,
        hook: &mut dyn SettlementHook,
        payload: &[u8],
    ) -> Result<(i128, i128)> {
        self.lock()?
            .swap(recipient, params, transfer, hook, payload)
    }

    pub fn set_protocol_fee_rate(&self, caller: Pubkey, protocol_fee_rate: u8) -> Result<()> {
        self.lock()?.set_protocol_fee_rate(caller, protocol_fee_rate)
    }

    pub fn collect_protocol_fees(
        &self,
        caller: Pubkey,
        recipient: Pubkey,
        transfer: &mut dyn AssetTransfer,
    ) -> Result<(u128, u128)> {
        self.lock()?
            .collect_protocol_fees(caller, recipient, transfer)
    }

    pub fn price_root(&self) -> Result<u128> {
        Ok(self.lock()?.price_root())
    }

    pub fn current_tick(&self) -> Result<i32> {
        Ok(self.lock()?.current_tick())
    }

    pub fn active_liquidity(&self) -> Result<u128> {
        self.lock()?.active_liquidity()
    }

    pub fn curve(&self) -> Result<CurveState> {
        Ok(*self.lock()?.curve())
    }

    pub fn bitmap_word_bytes(&self, word: i32) -> Result<[u8; 32]> {
        Ok(self.lock()?.bitmap_word_bytes(word))
    }

    pub fn protocol_fees(&self) -> Result<(u128, u128)> {
        Ok(self.lock()?.protocol_fees())
    }

    pub fn position(
        &self,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<Option<RangePosition>> {
        Ok(self.lock()?.position(owner, tick_lower, tick_upper))
    }

    pub fn ambient_position(&self, owner: &Pubkey) -> Result<u128> {
        Ok(self.lock()?.ambient_position(owner))
    }
}
