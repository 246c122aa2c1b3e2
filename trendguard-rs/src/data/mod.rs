//! Market data module
//!
//! OHLCV bars as delivered by the venue, oldest first.

pub mod bar;

pub use bar::*;
