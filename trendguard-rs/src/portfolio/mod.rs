//! Portfolio management module

pub mod balance;
pub mod position;
pub mod sizing;
pub mod trailing_stop;

pub use balance::*;
pub use position::*;
pub use sizing::*;
pub use trailing_stop::*;
