pub mod segment;
pub mod speaker;

pub use segment::*;
pub use speaker::*;
