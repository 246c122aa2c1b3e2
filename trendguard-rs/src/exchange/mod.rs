//! Exchange integration module
//!
//! The execution gateway seam the strategy trades through, plus the
//! Coinbase Exchange REST implementation of it.

pub mod auth;
pub mod client;
pub mod error;
pub mod gateway;
pub mod market;
pub mod order;
pub mod router;

pub use auth::*;
pub use client::*;
pub use error::*;
pub use gateway::*;
pub use market::*;
pub use order::*;
pub use router::*;
