//! Strategy configuration

use crate::config::ConfigError;
use crate::strategy::MIN_BARS;
use serde::{Deserialize, Serialize};

/// Strategy configuration, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Share of free collateral committed as margin per entry (e.g., 0.20 = 20%)
    pub risk_fraction: f64,
    /// Leverage applied to the margin
    pub leverage: f64,
    /// ATR multiple between price and the trailing stop
    pub volatility_multiplier: f64,
    /// Bars required before a snapshot is produced
    pub min_bars: usize,
    /// Entries whose margin cost falls below this are skipped (0 disables)
    pub min_order_cost: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            risk_fraction: 0.20,
            leverage: 5.0,
            volatility_multiplier: 1.5,
            min_bars: MIN_BARS,
            min_order_cost: 0.0,
        }
    }
}

impl StrategyConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.risk_fraction > 0.0 && self.risk_fraction <= 1.0) {
            return Err(ConfigError::RiskFraction(self.risk_fraction));
        }
        if !self.leverage.is_finite() || self.leverage < 1.0 {
            return Err(ConfigError::Leverage(self.leverage));
        }
        if !self.volatility_multiplier.is_finite() || self.volatility_multiplier <= 0.0 {
            return Err(ConfigError::VolatilityMultiplier(self.volatility_multiplier));
        }
        if self.min_bars < MIN_BARS {
            return Err(ConfigError::MinBars {
                required: MIN_BARS,
                actual: self.min_bars,
            });
        }
        if !self.min_order_cost.is_finite() || self.min_order_cost < 0.0 {
            return Err(ConfigError::MinOrderCost(self.min_order_cost));
        }
        Ok(())
    }
}
