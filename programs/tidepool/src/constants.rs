// Tidepool Protocol Constants
// Tick and price bounds follow the 1.0001 geometric ladder in Q64.64

/// Minimum tick index (p(i) = 1.0001^i, this gives price ~= 0)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index (this gives price ~= infinity for practical purposes)
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (Q64.64 format), the root price at MIN_TICK
pub const MIN_SQRT_PRICE_X64: u128 = 4295048017;

/// Maximum sqrt price (Q64.64 format), the root price at MAX_TICK
pub const MAX_SQRT_PRICE_X64: u128 = 79226673515401279992447579062;

/// Q64 multiplier (2^64)
pub const Q64: u128 = 1 << 64;

/// Fee rate denominator, fee rates are in parts per million of gross input
pub const FEE_RATE_DENOMINATOR: u32 = 1_000_000;

/// Highest swap fee a pool may charge (10%)
pub const MAX_FEE_RATE: u32 = 100_000;

/// Protocol cut is a percentage of collected fees
pub const PROTOCOL_FEE_RATE_DENOMINATOR: u8 = 100;

/// Highest protocol cut (25% of fees)
pub const MAX_PROTOCOL_FEE_RATE: u8 = 25;

/// Maximum tick spacing
pub const MAX_TICK_SPACING: u16 = 16384;

/// Terminal bitmap words cover 2^8 ticks
pub const TERM_WORD_BITS: u32 = 8;

/// Mezzanine bitmaps cover 2^8 terminal words
pub const MEZZ_WORD_BITS: u32 = 8;

/// Standard fee tiers
pub mod fee_tiers {
    /// 0.01% fee (tick spacing 1) - for stable pairs
    pub const FEE_TIER_100: u32 = 100;
    pub const TICK_SPACING_100: u16 = 1;

    /// 0.05% fee (tick spacing 10) - for stable pairs
    pub const FEE_TIER_500: u32 = 500;
    pub const TICK_SPACING_500: u16 = 10;

    /// 0.30% fee (tick spacing 60) - for most pairs
    pub const FEE_TIER_3000: u32 = 3000;
    pub const TICK_SPACING_3000: u16 = 60;

    /// 1.00% fee (tick spacing 200) - for exotic pairs
    pub const FEE_TIER_10000: u32 = 10000;
    pub const TICK_SPACING_10000: u16 = 200;

    /// Tick spacing paired with a standard fee rate
    pub fn spacing_for(fee_rate: u32) -> Option<u16> {
        match fee_rate {
            FEE_TIER_100 => Some(TICK_SPACING_100),
            FEE_TIER_500 => Some(TICK_SPACING_500),
            FEE_TIER_3000 => Some(TICK_SPACING_3000),
            FEE_TIER_10000 => Some(TICK_SPACING_10000),
            _ => None,
        }
    }
}
