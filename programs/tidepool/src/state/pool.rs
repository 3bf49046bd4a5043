use anchor_lang::prelude::*;

use crate::constants::{
    fee_tiers, MAX_FEE_RATE, MAX_PROTOCOL_FEE_RATE, MAX_TICK, MAX_TICK_SPACING, MIN_TICK,
};
use crate::errors::TidepoolError;
use crate::math::full_math::U256;
use crate::math::tick_math::is_valid_tick;
use crate::state::curve::CurveState;
use crate::state::level::{Level, LevelBook};
use crate::state::position::{PositionKey, PositionRegistrar, RangePosition};
use crate::state::protocol::ProtocolAccount;
use crate::state::tick_index::TickIndex;

/// Fixed parameters of a pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Asset paid on buys, priced in units of the quote asset
    pub base_mint: Pubkey,

    pub quote_mint: Pubkey,

    /// Holder of both assets on the pool's behalf
    pub vault: Pubkey,

    /// Principal allowed to change the protocol cut and collect it
    pub authority: Pubkey,

    /// Swap fee in parts per million of gross input
    pub fee_rate: u32,

    pub tick_spacing: u16,

    /// Protocol cut as a percentage of swap fees
    pub protocol_fee_rate: u8,
}

impl PoolConfig {
    /// Config for one of the standard fee tiers
    pub fn for_fee_tier(
        base_mint: Pubkey,
        quote_mint: Pubkey,
        vault: Pubkey,
        authority: Pubkey,
        fee_rate: u32,
        protocol_fee_rate: u8,
    ) -> Result<Self> {
        let tick_spacing =
            fee_tiers::spacing_for(fee_rate).ok_or(TidepoolError::InvalidTickSpacing)?;
        let config = Self {
            base_mint,
            quote_mint,
            vault,
            authority,
            fee_rate,
            tick_spacing,
            protocol_fee_rate,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.base_mint != self.quote_mint, TidepoolError::InvalidTokenPair);
        require!(self.fee_rate <= MAX_FEE_RATE, TidepoolError::FeeRateTooHigh);
        require!(
            self.protocol_fee_rate <= MAX_PROTOCOL_FEE_RATE,
            TidepoolError::ProtocolFeeTooHigh
        );
        require!(
            self.tick_spacing > 0 && self.tick_spacing <= MAX_TICK_SPACING,
            TidepoolError::InvalidTickSpacing
        );
        Ok(())
    }

    /// Check a position range against the tick bounds and spacing
    pub fn validate_range(&self, tick_lower: i32, tick_upper: i32) -> Result<()> {
        require!(tick_lower < tick_upper, TidepoolError::InvalidTickRange);
        require!(tick_lower >= MIN_TICK, TidepoolError::TickBelowMinimum);
        require!(tick_upper <= MAX_TICK, TidepoolError::TickAboveMaximum);
        require!(
            is_valid_tick(tick_lower, self.tick_spacing)
                && is_valid_tick(tick_upper, self.tick_spacing),
            TidepoolError::TickNotAligned
        );
        Ok(())
    }
}

/// Pool state: the curve plus everything swaps and positions touch
///
/// Operations live in `crate::instructions`, one file each. Every operation
/// stages its edits and writes them back only after settlement succeeds.
#[derive(Clone, Debug)]
pub struct Pool {
    pub(crate) config: PoolConfig,
    pub(crate) curve: CurveState,
    pub(crate) tick_index: TickIndex,
    pub(crate) levels: LevelBook,
    pub(crate) positions: PositionRegistrar,
    pub(crate) protocol: ProtocolAccount,
    pub(crate) initialized: bool,
}

impl Pool {
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            curve: CurveState::default(),
            tick_index: TickIndex::default(),
            levels: LevelBook::default(),
            positions: PositionRegistrar::default(),
            protocol: ProtocolAccount::default(),
            initialized: false,
        })
    }

    pub fn require_initialized(&self) -> Result<()> {
        require!(self.initialized, TidepoolError::PoolNotInitialized);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Current sqrt price (Q64.64)
    pub fn price_root(&self) -> u128 {
        self.curve.sqrt_price_x64
    }

    pub fn current_tick(&self) -> i32 {
        self.curve.current_tick
    }

    /// Ambient plus in-range concentrated liquidity
    pub fn active_liquidity(&self) -> Result<u128> {
        self.curve.active_liquidity()
    }

    pub fn curve(&self) -> &CurveState {
        &self.curve
    }

    /// Raw terminal bitmap word, bit i marks tick `word * 256 + i`
    pub fn bitmap_word(&self, word: i32) -> U256 {
        self.tick_index.terminal_word(word)
    }

    /// Terminal bitmap word as little-endian bytes
    pub fn bitmap_word_bytes(&self, word: i32) -> [u8; 32] {
        bytemuck::cast::<[u64; 4], [u8; 32]>(self.bitmap_word(word).0)
    }

    /// Protocol fees awaiting collection as (base, quote)
    pub fn protocol_fees(&self) -> (u128, u128) {
        (self.protocol.fees_base, self.protocol.fees_quote)
    }

    pub fn position(&self, owner: &Pubkey, tick_lower: i32, tick_upper: i32) -> Option<RangePosition> {
        self.positions
            .position(&PositionKey::new(*owner, tick_lower, tick_upper))
            .copied()
    }

    /// Ambient seeds held by `owner`
    pub fn ambient_position(&self, owner: &Pubkey) -> u128 {
        self.positions.ambient_seeds(owner)
    }

    pub fn level(&self, tick: i32) -> Level {
        self.levels.level(tick)
    }

    pub fn is_tick_initialized(&self, tick: i32) -> bool {
        self.tick_index.is_initialized(tick)
    }
}
