//! Validated indicator readings for one cycle

use serde::{Deserialize, Serialize};

/// Latest price and indicator values, all finite and in range.
///
/// Only [`MarketSnapshot::new`] builds one, so holding a snapshot means the
/// readings are usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    price: f64,
    trend_average: f64,
    momentum: f64,
    volatility: f64,
}

impl MarketSnapshot {
    /// `None` unless price, trend average and volatility are finite and > 0
    /// and momentum is finite and within [0, 100]
    pub fn new(price: f64, trend_average: f64, momentum: f64, volatility: f64) -> Option<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(price) || !positive(trend_average) || !positive(volatility) {
            return None;
        }
        if !momentum.is_finite() || !(0.0..=100.0).contains(&momentum) {
            return None;
        }

        Some(Self {
            price,
            trend_average,
            momentum,
            volatility,
        })
    }

    /// Latest close
    pub fn price(&self) -> f64 {
        self.price
    }

    /// EMA of closes
    pub fn trend_average(&self) -> f64 {
        self.trend_average
    }

    /// RSI of closes
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// ATR
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn is_uptrend(&self) -> bool {
        self.price > self.trend_average
    }
}
