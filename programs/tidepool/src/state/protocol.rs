use anchor_lang::prelude::*;

use crate::math::safe_math::safe_add;

/// Protocol share of swap fees awaiting collection
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtocolAccount {
    pub fees_base: u128,
    pub fees_quote: u128,
}

impl ProtocolAccount {
    /// Add a skimmed fee in the asset the swap was paid in
    pub fn accumulate(&mut self, paid_proto: u128, is_base: bool) -> Result<()> {
        if paid_proto == 0 {
            return Ok(());
        }
        if is_base {
            self.fees_base = safe_add(self.fees_base, paid_proto)?;
        } else {
            self.fees_quote = safe_add(self.fees_quote, paid_proto)?;
        }
        Ok(())
    }

    /// Read and zero both accumulators, returning (base, quote)
    pub fn disburse(&mut self) -> (u128, u128) {
        let owed = (self.fees_base, self.fees_quote);
        *self = Self::default();
        owed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_disburse() {
        let mut account = ProtocolAccount::default();
        account.accumulate(100, true).unwrap();
        account.accumulate(0, false).unwrap();
        account.accumulate(40, false).unwrap();
        account.accumulate(5, true).unwrap();

        assert_eq!(account.disburse(), (105, 40));
        assert_eq!(account, ProtocolAccount::default());
        // a second payout is empty
        assert_eq!(account.disburse(), (0, 0));
    }

    #[test]
    fn test_accumulate_overflow() {
        let mut account = ProtocolAccount {
            fees_base: u128::MAX,
            fees_quote: 0,
        };
        assert!(account.accumulate(1, true).is_err());
        assert_eq!(account.fees_base, u128::MAX);
    }
}
