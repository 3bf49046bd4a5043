//! Tidepool - Concentrated Liquidity AMM swap engine with ambient liquidity
//!
//! A single-pool engine mixing full-range (ambient) liquidity with
//! concentrated range positions on one constant-product curve.
//!
//! ## Architecture
//!
//! - **Curve engine**: swaps along the locally uniform curve between ticks,
//!   folding liquidity fees back into the curve as it goes
//! - **Two-tier tick bitmap**: terminal words per 256 ticks, a mezzanine tier
//!   per 256 words, for nearest-boundary search in either direction
//! - **Level book**: net liquidity and reward odometers per initialized tick
//! - **Positions**: ambient seeds and per-range positions with reward mileage
//! - **Settlement**: caller hooks deliver owed tokens, verified by balance delta
//!
//! ## Safety
//!
//! - All arithmetic uses checked operations
//! - Q64.64 fixed-point math with 256-bit intermediates
//! - Staged edits, committed only after settlement succeeds
//! - Single-writer pool access, reentrant calls fail

pub mod constants;
pub mod engine;
pub mod errors;
pub mod hooks;
pub mod instructions;
pub mod math;
pub mod shared;
pub mod state;
pub mod transfer;
pub mod utils;

pub use errors::TidepoolError;
pub use hooks::{DirectPull, SettlementHook, SettlementRequest};
pub use instructions::SwapParams;
pub use shared::SharedPool;
pub use state::{CurveState, Pool, PoolConfig, RangePosition};
pub use transfer::{AssetTransfer, MemoryLedger};
