//! Poll loop

mod error;
mod trader;

pub use error::*;
pub use trader::*;
