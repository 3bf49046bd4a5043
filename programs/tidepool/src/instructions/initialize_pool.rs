use anchor_lang::prelude::*;

use crate::errors::TidepoolError;
use crate::state::{CurveState, Pool};

impl Pool {
    /// Set the starting price. Allowed once per pool.
    pub fn initialize(&mut self, initial_sqrt_price_x64: u128) -> Result<()> {
        require!(!self.initialized, TidepoolError::PoolAlreadyInitialized);

        self.curve = CurveState::new(initial_sqrt_price_x64)?;
        self.initialized = true;

        msg!("Pool initialized");
        msg!("Base: {}", self.config.base_mint);
        msg!("Quote: {}", self.config.quote_mint);
        msg!("Fee rate: {}", self.config.fee_rate);
        msg!("Initial sqrt price: {}", initial_sqrt_price_x64);
        msg!("Initial tick: {}", self.curve.current_tick);

        Ok(())
    }
}
