pub mod curve_engine;
pub mod sweep;

pub use curve_engine::*;
pub use sweep::*;
