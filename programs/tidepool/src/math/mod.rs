pub mod full_math;
pub mod safe_math;
pub mod bit_math;
pub mod tick_math;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;

pub use full_math::*;
pub use safe_math::*;
pub use bit_math::*;
pub use tick_math::*;
pub use liquidity_math::*;
pub use sqrt_price_math::*;
pub use swap_math::*;
