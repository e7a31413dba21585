pub mod compare;
pub mod core;
pub mod stats;


pub use self::compare::*;
pub use self::core::*;
pub use self::stats::*;
