//! Leverage-aware position sizing

use crate::config::StrategyConfig;
use crate::exchange::GatewayError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Order size for one entry. `quantity == 0` means "do not trade".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizingResult {
    /// Base-asset quantity to buy
    pub quantity: f64,
    /// Collateral committed as margin
    pub margin_cost: f64,
}

impl SizingResult {
    /// Nothing to trade
    pub const fn zero() -> Self {
        Self {
            quantity: 0.0,
            margin_cost: 0.0,
        }
    }

    pub fn is_tradable(&self) -> bool {
        self.quantity > 0.0
    }

    /// Leveraged exposure (margin × leverage), derived from quantity and price
    pub fn notional(&self, price: f64) -> f64 {
        self.quantity * price
    }
}

/// Turns free collateral into an order quantity
#[derive(Debug, Clone, Copy)]
pub struct PositionSizer {
    risk_fraction: f64,
    leverage: f64,
    min_order_cost: f64,
}

impl PositionSizer {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            risk_fraction: config.risk_fraction,
            leverage: config.leverage,
            min_order_cost: config.min_order_cost,
        }
    }

    /// Size an entry at `price` from `free_collateral`.
    ///
    /// `margin = collateral × risk`, `notional = margin × leverage`,
    /// `quantity = notional / price`. Never rounds up.
    pub fn size(&self, price: f64, free_collateral: f64) -> SizingResult {
        if !price.is_finite() || price <= 0.0 {
            warn!("⚠️ Cannot size position at price {}", price);
            return SizingResult::zero();
        }
        if !free_collateral.is_finite() || free_collateral <= 0.0 {
            debug!("No free collateral available ({})", free_collateral);
            return SizingResult::zero();
        }

        let margin_cost = free_collateral * self.risk_fraction;
        if margin_cost < self.min_order_cost {
            warn!(
                "⚠️ Order too small: ${:.2} < ${:.2} minimum. Skipping.",
                margin_cost, self.min_order_cost
            );
            return SizingResult::zero();
        }

        let notional = margin_cost * self.leverage;
        SizingResult {
            quantity: notional / price,
            margin_cost,
        }
    }

    /// Size from a collateral lookup; a failed lookup sizes to zero
    pub fn size_from_lookup(
        &self,
        price: f64,
        free_collateral: Result<f64, GatewayError>,
    ) -> SizingResult {
        match free_collateral {
            Ok(collateral) => self.size(price, collateral),
            Err(e) => {
                warn!("Balance Error: {}", e);
                SizingResult::zero()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizer() -> PositionSizer {
        PositionSizer::new(&StrategyConfig {
            risk_fraction: 0.2,
            leverage: 5.0,
            ..StrategyConfig::default()
        })
    }

    #[test]
    fn test_reference_sizing() {
        let result = sizer().size(110.0, 1000.0);
        assert!((result.margin_cost - 200.0).abs() < 1e-9);
        assert!((result.notional(110.0) - 1000.0).abs() < 1e-9);
        assert!((result.quantity - 1000.0 / 110.0).abs() < 1e-12);
        assert!(result.is_tradable());
    }

    #[test]
    fn test_no_collateral_means_no_trade() {
        assert_eq!(sizer().size(110.0, 0.0), SizingResult::zero());
        assert_eq!(sizer().size(110.0, f64::NAN), SizingResult::zero());
        assert_eq!(sizer().size(0.0, 1000.0), SizingResult::zero());
    }

    #[test]
    fn test_failed_lookup_sizes_to_zero() {
        let result = sizer().size_from_lookup(110.0, Err(GatewayError::CollateralUnavailable));
        assert_eq!(result, SizingResult::zero());
        assert!(!result.is_tradable());
    }

    #[test]
    fn test_min_order_cost_guard() {
        let sizer = PositionSizer::new(&StrategyConfig {
            min_order_cost: 10.0,
            ..StrategyConfig::default()
        });
        // 20% of 40 = 8 < 10
        assert_eq!(sizer.size(100.0, 40.0), SizingResult::zero());
        assert!(sizer.size(100.0, 60.0).is_tradable());
    }
}
