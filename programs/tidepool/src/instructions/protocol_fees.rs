use anchor_lang::prelude::*;

use crate::constants::MAX_PROTOCOL_FEE_RATE;
use crate::errors::TidepoolError;
use crate::hooks::push_outflow;
use crate::state::Pool;
use crate::transfer::AssetTransfer;

impl Pool {
    fn require_authority(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.config.authority, TidepoolError::Unauthorized);
        Ok(())
    }

    /// Change the protocol's percentage of swap fees
    pub fn set_protocol_fee_rate(&mut self, caller: Pubkey, protocol_fee_rate: u8) -> Result<()> {
        self.require_authority(&caller)?;
        require!(
            protocol_fee_rate <= MAX_PROTOCOL_FEE_RATE,
            TidepoolError::ProtocolFeeTooHigh
        );

        let previous = self.config.protocol_fee_rate;
        self.config.protocol_fee_rate = protocol_fee_rate;

        msg!("Protocol fee rate: {}% -> {}%", previous, protocol_fee_rate);
        Ok(())
    }

    /// Pay out all accumulated protocol fees to `recipient`
    pub fn collect_protocol_fees(
        &mut self,
        caller: Pubkey,
        recipient: Pubkey,
        transfer: &mut dyn AssetTransfer,
    ) -> Result<(u128, u128)> {
        self.require_authority(&caller)?;

        let mut protocol = self.protocol;
        let (fees_base, fees_quote) = protocol.disburse();

        let vault = self.config.vault;
        push_outflow(transfer, &self.config.base_mint, &vault, &recipient, fees_base)?;
        push_outflow(transfer, &self.config.quote_mint, &vault, &recipient, fees_quote)?;

        self.protocol = protocol;

        msg!("Protocol fees collected");
        msg!("Recipient: {}", recipient);
        msg!("Base: {}, Quote: {}", fees_base, fees_quote);

        Ok((fees_base, fees_quote))
    }
}
