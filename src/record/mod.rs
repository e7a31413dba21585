pub mod core;
pub mod parse;


pub use self::core::*;
pub use self::parse::*;
