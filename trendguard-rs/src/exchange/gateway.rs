//! Execution gateway trait

use async_trait::async_trait;

use crate::config::Timeframe;
use crate::data::Bar;
use crate::exchange::{GatewayError, OrderConfirmation, ProductInfo, Ticker};
use crate::portfolio::AccountBalances;

/// Everything the trader needs from a venue.
///
/// Implementations report failures as [`GatewayError`]; callers decide how a failure
/// degrades (empty bars, zero collateral, unchanged position).
#[async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Most recent `limit` bars, oldest first
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, GatewayError>;

    /// All account balances
    async fn fetch_balances(&self) -> Result<AccountBalances, GatewayError>;

    /// Free quote collateral (USD, falling back to USDC)
    async fn fetch_free_collateral(&self) -> Result<f64, GatewayError> {
        self.fetch_balances().await?.free_collateral()
    }

    /// Latest trade price
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, GatewayError>;

    /// Immediate market buy of `quantity` base units
    async fn submit_market_buy(
        &self,
        symbol: &str,
        quantity: f64,
    ) -> Result<OrderConfirmation, GatewayError>;

    /// Immediate market sell of `quantity` base units
    async fn submit_market_sell(
        &self,
        symbol: &str,
        quantity: f64,
    ) -> Result<OrderConfirmation, GatewayError>;

    /// Listed products; doubles as the connectivity check
    async fn load_products(&self) -> Result<Vec<ProductInfo>, GatewayError>;

    /// Set account leverage for a symbol
    async fn set_leverage(&self, _leverage: f64, _symbol: &str) -> Result<(), GatewayError> {
        Err(GatewayError::Unsupported("setting leverage"))
    }

    /// Cancel an order that has not filled yet
    async fn cancel_order(&self, order_id: &str, symbol: &str) -> Result<(), GatewayError>;
}
