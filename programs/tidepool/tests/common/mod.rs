#![allow(dead_code)]

use anchor_lang::prelude::*;
use tidepool::constants::{MAX_SQRT_PRICE_X64, MIN_SQRT_PRICE_X64};
use tidepool::transfer::{AssetTransfer, MemoryLedger};
use tidepool::{DirectPull, PoolConfig, SharedPool, SwapParams};

/// Starting balance of every funded account
pub const FUNDING: u128 = 1_000_000_000_000_000;

/// A pool with a funded trader and an in-memory ledger
pub struct Harness {
    pub pool: SharedPool,
    pub ledger: MemoryLedger,
    pub base: Pubkey,
    pub quote: Pubkey,
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub trader: Pubkey,
}

impl Harness {
    pub fn new(fee_rate: u32, tick_spacing: u16, protocol_fee_rate: u8, sqrt_price_x64: u128) -> Self {
        let config = PoolConfig {
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            fee_rate,
            tick_spacing,
            protocol_fee_rate,
        };
        let pool = SharedPool::new(config).unwrap();
        pool.initialize(sqrt_price_x64).unwrap();

        let trader = Pubkey::new_unique();
        let mut ledger = MemoryLedger::new();
        ledger.credit(&config.base_mint, &trader, FUNDING).unwrap();
        ledger.credit(&config.quote_mint, &trader, FUNDING).unwrap();

        Self {
            pool,
            ledger,
            base: config.base_mint,
            quote: config.quote_mint,
            vault: config.vault,
            authority: config.authority,
            trader,
        }
    }

    pub fn mint(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u128, u128)> {
        self.pool.mint(
            self.trader,
            tick_lower,
            tick_upper,
            liquidity,
            &mut self.ledger,
            &mut DirectPull::new(self.trader),
            &[],
        )
    }

    pub fn burn(&mut self, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<(u128, u128)> {
        self.pool.burn(
            self.trader,
            self.trader,
            tick_lower,
            tick_upper,
            liquidity,
            &mut self.ledger,
        )
    }

    pub fn mint_ambient(&mut self, liquidity: u128) -> Result<(u128, u128)> {
        self.pool.mint_ambient(
            self.trader,
            liquidity,
            &mut self.ledger,
            &mut DirectPull::new(self.trader),
            &[],
        )
    }

    pub fn burn_ambient(&mut self, liquidity: u128) -> Result<(u128, u128)> {
        self.pool
            .burn_ambient(self.trader, self.trader, liquidity, &mut self.ledger)
    }

    pub fn swap(&mut self, params: SwapParams) -> Result<(i128, i128)> {
        self.pool.swap(
            self.trader,
            params,
            &mut self.ledger,
            &mut DirectPull::new(self.trader),
            &[],
        )
    }

    /// Exact-input buy paying `qty` base
    pub fn buy(&mut self, qty: u128, limit_sqrt_price_x64: u128) -> Result<(i128, i128)> {
        self.swap(SwapParams {
            is_buy: true,
            in_base_qty: true,
            qty,
            limit_sqrt_price_x64,
        })
    }

    /// Exact-input sell paying `qty` quote
    pub fn sell(&mut self, qty: u128, limit_sqrt_price_x64: u128) -> Result<(i128, i128)> {
        self.swap(SwapParams {
            is_buy: false,
            in_base_qty: false,
            qty,
            limit_sqrt_price_x64,
        })
    }

    pub fn buy_unlimited(&mut self, qty: u128) -> Result<(i128, i128)> {
        self.buy(qty, MAX_SQRT_PRICE_X64)
    }

    pub fn sell_unlimited(&mut self, qty: u128) -> Result<(i128, i128)> {
        self.sell(qty, MIN_SQRT_PRICE_X64)
    }

    pub fn balance(&self, mint: &Pubkey, holder: &Pubkey) -> u128 {
        self.ledger.balance_of(mint, holder)
    }
}

/// Numeric code of an Anchor error
pub fn error_code(err: anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        anchor_lang::error::Error::ProgramError(e) => panic!("unexpected program error: {e:?}"),
    }
}
