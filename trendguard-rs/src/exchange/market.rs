//! Market metadata returned by the venue

use serde::{Deserialize, Serialize};

/// Latest trade for a symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    /// Last traded price
    pub last: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

/// A tradable product listed by the venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Venue product id (e.g., "ETH-USD")
    pub id: String,
    /// Symbol in BASE/QUOTE form
    pub symbol: String,
    pub display_name: Option<String>,
    pub trading_disabled: bool,
}
