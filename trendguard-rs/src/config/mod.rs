//! Configuration module

mod error;
mod strategy;
mod trader;

pub use error::*;
pub use strategy::*;
pub use trader::*;
