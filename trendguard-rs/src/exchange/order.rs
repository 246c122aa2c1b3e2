//! Order management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

impl OrderSide {
    /// Wire value expected by the venue
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

/// Order status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Received, not yet on the book
    Pending,
    /// Open on the book
    Open,
    /// Done (filled or settled)
    Filled,
    /// Cancelled
    Cancelled,
    /// Rejected
    Rejected,
    /// Anything the venue added later
    Other(String),
}

impl OrderStatus {
    pub fn from_venue(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "pending" | "received" => Self::Pending,
            "open" | "active" => Self::Open,
            "done" | "filled" | "settled" => Self::Filled,
            "cancelled" | "canceled" => Self::Cancelled,
            "rejected" => Self::Rejected,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Open => f.write_str("open"),
            Self::Filled => f.write_str("filled"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Rejected => f.write_str("rejected"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// What the venue returns for an accepted market order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Order ID
    pub id: String,
    /// Status at acceptance time
    pub status: OrderStatus,
    /// Order side
    pub side: OrderSide,
    /// Requested quantity
    pub quantity: f64,
}

impl OrderConfirmation {
    pub fn new(id: impl Into<String>, status: OrderStatus, side: OrderSide, quantity: f64) -> Self {
        Self {
            id: id.into(),
            status,
            side,
            quantity,
        }
    }

    /// Check if order is filled
    pub fn is_filled(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}
