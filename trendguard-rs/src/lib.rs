//! TrendGuard: a single-asset trend-following trader
//!
//! The crate is the decision engine of the bot plus the pieces it needs to talk to a venue:
//! - [ta-rs](https://github.com/greyblake/ta-rs) for the EMA / RSI / ATR math
//! - [reqwest](https://docs.rs/reqwest) for the Coinbase Exchange REST API
//!
//! # Features
//!
//! - **Data**: OHLCV bars, oldest first
//! - **Indicators**: EMA 20 trend filter, RSI 14 momentum, ATR 14 volatility
//! - **Strategy**: market snapshot validation and the flat/long state machine
//! - **Portfolio**: position, leverage-aware sizing and the ATR trailing stop
//! - **Exchange**: execution gateway trait and the Coinbase client
//! - **Runner**: fixed-interval poll loop with per-cycle failure isolation
//!
//! # Example
//!
//! ```no_run
//! use trendguard_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let gateway = CoinbaseClient::new(Credentials::default(), VenueEnvironment::Sandbox)?;
//!     let strategy = TrendFollower::new(StrategyConfig::default())?;
//!     let mut trader = Trader::new(gateway, strategy, TraderSettings::default());
//!     trader.run_until(tokio::signal::ctrl_c()).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod exchange;
pub mod indicators;
pub mod portfolio;
pub mod runner;
pub mod strategy;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::exchange::*;
    pub use crate::indicators::*;
    pub use crate::portfolio::*;
    pub use crate::runner::*;
    pub use crate::strategy::*;

    pub use anyhow::{Context, Result};
}

/// Result type alias
pub type Result<T> = anyhow::Result<T>;
