//! Routes buy/sell intents to the gateway, or simulates them when trading is disabled

use crate::exchange::{ExecutionGateway, GatewayError, OrderConfirmation, OrderSide};
use tracing::info;

/// Outcome of a successful order intent
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// Accepted by the venue
    Confirmed(OrderConfirmation),
    /// Trading disabled; treated exactly like a confirmed fill
    Simulated { side: OrderSide, quantity: f64 },
}

impl Fill {
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated { .. })
    }

    pub fn order_id(&self) -> Option<&str> {
        match self {
            Self::Confirmed(confirmation) => Some(&confirmation.id),
            Self::Simulated { .. } => None,
        }
    }
}

/// Submits market orders for one symbol
pub struct OrderRouter<'a, G: ExecutionGateway + ?Sized> {
    gateway: &'a G,
    symbol: &'a str,
    trading_enabled: bool,
}

impl<'a, G: ExecutionGateway + ?Sized> OrderRouter<'a, G> {
    pub fn new(gateway: &'a G, symbol: &'a str, trading_enabled: bool) -> Self {
        Self {
            gateway,
            symbol,
            trading_enabled,
        }
    }

    pub fn trading_enabled(&self) -> bool {
        self.trading_enabled
    }

    pub fn gateway(&self) -> &'a G {
        self.gateway
    }

    pub fn symbol(&self) -> &'a str {
        self.symbol
    }

    /// Market order for `quantity`. Never called with a zero quantity.
    pub async fn submit(&self, side: OrderSide, quantity: f64) -> Result<Fill, GatewayError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(GatewayError::InvalidQuantity(quantity));
        }

        if !self.trading_enabled {
            info!("   (Simulated {} {:.6} {} - use --execute to enable real trading)", side, quantity, self.symbol);
            return Ok(Fill::Simulated { side, quantity });
        }

        let confirmation = match side {
            OrderSide::Buy => self.gateway.submit_market_buy(self.symbol, quantity).await?,
            OrderSide::Sell => self.gateway.submit_market_sell(self.symbol, quantity).await?,
        };
        info!("✅ {} order executed: {} ({})", side, confirmation.id, confirmation.status);
        Ok(Fill::Confirmed(confirmation))
    }
}
