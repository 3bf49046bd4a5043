use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::errors::TidepoolError;
use crate::math::full_math::{mul_div, mul_q64};
use crate::math::safe_math::{safe_add, safe_sub};

/// Identifies a ranged position: one record per owner and range
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl PositionKey {
    pub fn new(owner: Pubkey, tick_lower: i32, tick_upper: i32) -> Self {
        Self {
            owner,
            tick_lower,
            tick_upper,
        }
    }
}

/// Concentrated liquidity position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangePosition {
    /// Amount of liquidity in this position
    pub liquidity: u128,

    /// Range mileage at the last mint into this position (Q64.64)
    pub fee_mileage_x64: u128,

    /// Rewards realized on earlier mints, in ambient seeds
    pub rewards_owed: u128,
}

impl RangePosition {
    /// Rewards earned by `liquidity` since the snapshot, in ambient seeds
    ///
    /// rewards = liquidity * (mileage - snapshot) / 2^64
    fn accrued(&self, liquidity: u128, fee_mileage_x64: u128) -> Result<u128> {
        let delta = fee_mileage_x64.wrapping_sub(self.fee_mileage_x64);
        if delta == 0 || liquidity == 0 {
            return Ok(0);
        }
        mul_q64(liquidity, delta)
    }

    /// Add liquidity, folding pending rewards into `rewards_owed` first
    pub fn add_liquidity(&mut self, amount: u128, fee_mileage_x64: u128) -> Result<()> {
        let pending = self.accrued(self.liquidity, fee_mileage_x64)?;
        self.rewards_owed = safe_add(self.rewards_owed, pending)?;
        self.liquidity = self
            .liquidity
            .checked_add(amount)
            .ok_or(TidepoolError::LiquidityOverflow)?;
        self.fee_mileage_x64 = fee_mileage_x64;
        Ok(())
    }

    /// Remove liquidity and return the reward seeds it earned
    ///
    /// Only the removed `amount` realizes mileage, plus its pro-rata share of
    /// rewards folded in by earlier mints. The remaining liquidity keeps its
    /// snapshot.
    pub fn remove_liquidity(&mut self, amount: u128, fee_mileage_x64: u128) -> Result<u128> {
        if amount > self.liquidity {
            return Err(TidepoolError::PositionUnderflow.into());
        }

        let earned = self.accrued(amount, fee_mileage_x64)?;
        let folded = if amount == self.liquidity {
            self.rewards_owed
        } else {
            mul_div(self.rewards_owed, amount, self.liquidity)?
        };

        self.rewards_owed = safe_sub(self.rewards_owed, folded)?;
        self.liquidity -= amount;
        safe_add(earned, folded)
    }
}

/// Registry of every position held in the pool
///
/// Edits are staged on copies returned by `add_liquidity`/`remove_liquidity`
/// and written back with `commit` once settlement succeeds.
#[derive(Clone, Debug, Default)]
pub struct PositionRegistrar {
    ranged: HashMap<PositionKey, RangePosition>,
    ambient: HashMap<Pubkey, u128>,
}

impl PositionRegistrar {
    pub fn position(&self, key: &PositionKey) -> Option<&RangePosition> {
        self.ranged.get(key)
    }

    /// Ambient seeds held by an owner
    pub fn ambient_seeds(&self, owner: &Pubkey) -> u128 {
        self.ambient.get(owner).copied().unwrap_or(0)
    }

    /// Stage a mint into a range at the range's current mileage
    pub fn add_liquidity(
        &self,
        key: &PositionKey,
        amount: u128,
        fee_mileage_x64: u128,
    ) -> Result<RangePosition> {
        let mut position = self.ranged.get(key).copied().unwrap_or_default();
        position.add_liquidity(amount, fee_mileage_x64)?;
        Ok(position)
    }

    /// Stage a burn from a range, returning the staged record and reward seeds
    pub fn remove_liquidity(
        &self,
        key: &PositionKey,
        amount: u128,
        fee_mileage_x64: u128,
    ) -> Result<(RangePosition, u128)> {
        let mut position = *self
            .ranged
            .get(key)
            .ok_or(TidepoolError::PositionNotFound)?;
        let rewards = position.remove_liquidity(amount, fee_mileage_x64)?;
        Ok((position, rewards))
    }

    /// Write a staged position back. Emptied records stay until reused.
    pub fn commit(&mut self, key: PositionKey, position: RangePosition) {
        self.ranged.insert(key, position);
    }

    /// Stage an ambient mint, returning the owner's new seed balance
    pub fn add_ambient(&self, owner: &Pubkey, seeds: u128) -> Result<u128> {
        self.ambient_seeds(owner)
            .checked_add(seeds)
            .ok_or(TidepoolError::LiquidityOverflow.into())
    }

    /// Stage an ambient burn, returning the owner's new seed balance
    pub fn remove_ambient(&self, owner: &Pubkey, seeds: u128) -> Result<u128> {
        self.ambient_seeds(owner)
            .checked_sub(seeds)
            .ok_or(TidepoolError::PositionUnderflow.into())
    }

    pub fn commit_ambient(&mut self, owner: Pubkey, seeds: u128) {
        if seeds == 0 {
            self.ambient.remove(&owner);
        } else {
            self.ambient.insert(owner, seeds);
        }
    }
}
