pub mod curve;
pub mod level;
pub mod pool;
pub mod position;
pub mod protocol;
pub mod tick_index;

pub use curve::*;
pub use level::*;
pub use pool::*;
pub use position::*;
pub use protocol::*;
pub use tick_index::*;
