use anchor_lang::prelude::*;

/// Tidepool Error Codes
/// Grouped by failure class: arithmetic, validation, settlement, access
#[error_code]
pub enum TidepoolError {
    // ═══════════════════════════════════════════════════════════════════════
    // MATH ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Arithmetic overflow in checked operation
    #[msg("Math overflow")]
    MathOverflow, // 6000

    /// Arithmetic underflow in checked operation
    #[msg("Math underflow")]
    MathUnderflow, // 6001

    /// Division by zero attempted
    #[msg("Division by zero")]
    DivisionByZero, // 6002

    /// Result doesn't fit in expected type
    #[msg("Cast overflow")]
    CastOverflow, // 6003

    /// Multiplication overflow in Q64.64 math
    #[msg("Multiplication overflow in fixed-point math")]
    MulDivOverflow, // 6004

    // ═══════════════════════════════════════════════════════════════════════
    // LIQUIDITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// A liquidity delta would push active or level liquidity below zero
    #[msg("Liquidity underflow")]
    LiquidityUnderflow, // 6005

    /// Liquidity overflow
    #[msg("Liquidity overflow")]
    LiquidityOverflow, // 6006

    /// Burn exceeds the liquidity held by the position
    #[msg("Position liquidity underflow")]
    PositionUnderflow, // 6007

    /// Liquidity amount is zero
    #[msg("Zero liquidity")]
    ZeroLiquidity, // 6008

    /// Position not found
    #[msg("Position not found")]
    PositionNotFound, // 6009

    // ═══════════════════════════════════════════════════════════════════════
    // TICK / PRICE ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Tick is below minimum allowed
    #[msg("Tick below minimum")]
    TickBelowMinimum, // 6010

    /// Tick is above maximum allowed
    #[msg("Tick above maximum")]
    TickAboveMaximum, // 6011

    /// Tick is not aligned to tick spacing
    #[msg("Tick not aligned to spacing")]
    TickNotAligned, // 6012

    /// Lower tick must be less than upper tick
    #[msg("Lower tick must be less than upper tick")]
    InvalidTickRange, // 6013

    /// Sqrt price is below minimum
    #[msg("Sqrt price below minimum")]
    SqrtPriceBelowMinimum, // 6014

    /// Sqrt price is above maximum
    #[msg("Sqrt price above maximum")]
    SqrtPriceAboveMaximum, // 6015

    /// Price limit outside the global price range
    #[msg("Invalid price limit")]
    InvalidPriceLimit, // 6016

    /// Swap amount is zero
    #[msg("Zero swap amount")]
    ZeroSwapAmount, // 6017

    // ═══════════════════════════════════════════════════════════════════════
    // POOL ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Pool already initialized
    #[msg("Pool already initialized")]
    PoolAlreadyInitialized, // 6018

    /// Pool not initialized
    #[msg("Pool not initialized")]
    PoolNotInitialized, // 6019

    /// Base and quote mints must differ
    #[msg("Invalid token pair")]
    InvalidTokenPair, // 6020

    /// Fee rate exceeds maximum
    #[msg("Fee rate too high")]
    FeeRateTooHigh, // 6021

    /// Protocol fee exceeds maximum
    #[msg("Protocol fee too high")]
    ProtocolFeeTooHigh, // 6022

    /// Tick spacing is zero or above maximum
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing, // 6023

    // ═══════════════════════════════════════════════════════════════════════
    // SETTLEMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Settlement hook did not deliver the owed balance delta
    #[msg("Settlement shortfall")]
    SettlementShortfall, // 6024

    /// Holder balance too small for a transfer
    #[msg("Insufficient balance")]
    InsufficientBalance, // 6025

    /// Asset transfer collaborator refused the transfer
    #[msg("Transfer failed")]
    TransferFailed, // 6026

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESS CONTROL ERRORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Pool state is already locked by an in-flight operation
    #[msg("Reentrant call")]
    Reentrancy, // 6027

    /// Not the pool authority
    #[msg("Unauthorized")]
    Unauthorized, // 6028
}
