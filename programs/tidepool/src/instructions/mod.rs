pub mod ambient;
pub mod burn;
pub mod initialize_pool;
pub mod mint;
pub mod protocol_fees;
pub mod swap;

pub use swap::SwapParams;
