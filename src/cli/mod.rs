pub mod info;
pub mod transform;

pub use info::*;
pub use transform::*;
