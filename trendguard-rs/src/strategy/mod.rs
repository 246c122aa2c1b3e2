//! Strategy engine module
//!
//! Turns a bar window into a validated market snapshot and drives the
//! flat/long state machine from it.

pub mod signal;
pub mod snapshot;
pub mod trend_follower;

pub use signal::*;
pub use snapshot::*;
pub use trend_follower::*;

/// Bars required before any snapshot is produced
pub const MIN_BARS: usize = 20;

/// EMA period of the trend filter
pub const TREND_PERIOD: usize = 20;

/// RSI period of the momentum filter
pub const MOMENTUM_PERIOD: usize = 14;

/// ATR period of the trailing stop distance
pub const VOLATILITY_PERIOD: usize = 14;

/// Momentum must be strictly above this to enter
pub const ENTRY_MOMENTUM: f64 = 50.0;
