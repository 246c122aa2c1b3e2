//! ATR trailing stop ("crash protection")

use crate::config::StrategyConfig;

/// Computes and ratchets the protective stop of an open position.
///
/// The stop sits `volatility × multiplier` below price and only ever moves up
/// while the position is held.
#[derive(Debug, Clone, Copy)]
pub struct TrailingStop {
    multiplier: f64,
}

impl TrailingStop {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            multiplier: config.volatility_multiplier,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Stop distance below price. Not clamped: a negative stop just never fires.
    pub fn candidate(&self, price: f64, volatility: f64) -> f64 {
        price - volatility * self.multiplier
    }

    /// Stop for a fresh entry
    pub fn initial(&self, entry_price: f64, volatility: f64) -> f64 {
        self.candidate(entry_price, volatility)
    }

    /// Raise `current` to the new candidate if that is higher, otherwise keep it
    pub fn ratchet(&self, current: f64, price: f64, volatility: f64) -> f64 {
        let candidate = self.candidate(price, volatility);
        if candidate > current {
            candidate
        } else {
            current
        }
    }

    /// Exit fires once price trades at or below the stop
    pub fn is_triggered(price: f64, stop: f64) -> bool {
        price <= stop
    }
}
