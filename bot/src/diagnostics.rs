//! `--test` mode: one pass over every venue call the bot depends on

use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn};
use trendguard_rs::config::TraderSettings;
use trendguard_rs::exchange::{ExecutionGateway, Fill, OrderRouter, OrderSide, ProductInfo};
use trendguard_rs::portfolio::{AccountBalances, COLLATERAL_CURRENCIES};
use trendguard_rs::strategy::TrendFollower;

use crate::startup;

const RULE: &str = "============================================================";

/// Run every check and report; individual failures are logged, never fatal
pub async fn run<G>(
    gateway: &G,
    strategy: &TrendFollower,
    settings: &TraderSettings,
    products: &[ProductInfo],
    sandbox: bool,
) -> Result<()>
where
    G: ExecutionGateway + ?Sized,
{
    info!("{}", RULE);
    info!("RUNNING TESTS");
    info!("{}", RULE);

    info!("📊 Loaded {} markets", products.len());
    if startup::require_symbol(products, &settings.symbol, settings.base_asset()).is_err() {
        warn!("   Continuing so the remaining checks still run");
    }

    let balances = check_balance(gateway).await;
    check_data(gateway, settings).await;
    check_analysis(gateway, strategy, settings).await;
    if let Some(balances) = balances {
        check_trade_execution(gateway, strategy, settings, &balances, sandbox).await;
    }

    info!("{}", RULE);
    info!("TEST COMPLETE");
    info!("{}", RULE);
    Ok(())
}

async fn check_balance<G>(gateway: &G) -> Option<AccountBalances>
where
    G: ExecutionGateway + ?Sized,
{
    info!("💰 Testing Balance Fetch...");
    match gateway.fetch_balances().await {
        Ok(balances) => {
            info!("✅ Balance fetched successfully");
            for currency in COLLATERAL_CURRENCIES {
                if let Some(b) = balances.get(currency) {
                    info!(
                        "   {} - Free: ${:.2}, Used: ${:.2}, Total: ${:.2}",
                        b.currency, b.free, b.used, b.total
                    );
                }
            }
            Some(balances)
        }
        Err(e) => {
            error!("❌ Balance Error: {}", e);
            None
        }
    }
}

async fn check_data<G>(gateway: &G, settings: &TraderSettings)
where
    G: ExecutionGateway + ?Sized,
{
    info!("📈 Testing Data Fetch...");
    match gateway
        .fetch_bars(&settings.symbol, settings.timeframe, settings.bar_limit)
        .await
    {
        Ok(bars) => match bars.last() {
            Some(last) => {
                info!("✅ Data fetched successfully ({} candles)", bars.len());
                info!("   Latest price: ${:.2}", last.close);
            }
            None => error!("❌ No data returned"),
        },
        Err(e) => error!("❌ Data fetch error: {}", e),
    }
}

async fn check_analysis<G>(gateway: &G, strategy: &TrendFollower, settings: &TraderSettings)
where
    G: ExecutionGateway + ?Sized,
{
    info!("🔍 Testing Market Analysis...");
    let bars = match gateway
        .fetch_bars(&settings.symbol, settings.timeframe, settings.bar_limit)
        .await
    {
        Ok(bars) if !bars.is_empty() => bars,
        Ok(_) => {
            error!("❌ Cannot analyze - no data");
            return;
        }
        Err(e) => {
            error!("❌ Analysis error: {}", e);
            return;
        }
    };

    match strategy.analyze(&bars) {
        Some(snapshot) => {
            info!("✅ Analysis complete");
            info!("   Price: ${:.2}", snapshot.price());
            info!("   EMA 20: ${:.2}", snapshot.trend_average());
            info!("   RSI: {:.2}", snapshot.momentum());
            info!("   ATR: ${:.2}", snapshot.volatility());
            info!(
                "   Entry signal: {}",
                if strategy.entry_signal(&snapshot) { "yes" } else { "no" }
            );
        }
        None => error!("❌ Not enough data for analysis ({} bars)", bars.len()),
    }
}

async fn check_trade_execution<G>(
    gateway: &G,
    strategy: &TrendFollower,
    settings: &TraderSettings,
    balances: &AccountBalances,
    sandbox: bool,
) where
    G: ExecutionGateway + ?Sized,
{
    info!("🧪 Testing Trade Execution...");

    let price = match gateway.fetch_ticker(&settings.symbol).await {
        Ok(ticker) => ticker.last,
        Err(e) => {
            error!("❌ Trade test error: {}", e);
            return;
        }
    };
    info!("   Current {} price: ${:.2}", settings.symbol, price);

    let collateral = balances.free_collateral().unwrap_or(0.0);
    if collateral <= 0.0 {
        warn!("⚠️  No USD/USDC balance available for testing");
        return;
    }

    let sizing = strategy.sizer().size(price, collateral);
    let leverage = strategy.config().leverage;
    info!(
        "   Calculated position size: {:.6} {}",
        sizing.quantity,
        settings.base_asset()
    );
    info!("   Margin to use: ${:.2}", sizing.margin_cost);
    info!(
        "   Position value (with {}x leverage): ${:.2}",
        leverage,
        sizing.notional(price)
    );
    if !sizing.is_tradable() {
        warn!("⚠️  Position sized to zero, nothing to submit");
        return;
    }

    if !settings.trading_enabled {
        info!("   (Trading disabled - use --execute flag to enable)");
        info!("   Would execute: BUY {:.6} {}", sizing.quantity, settings.symbol);
        return;
    }

    warn!("⚠️  EXECUTING TEST TRADE (Sandbox: {})...", sandbox);
    let router = OrderRouter::new(gateway, &settings.symbol, true);
    match router.submit(OrderSide::Buy, sizing.quantity).await {
        Ok(Fill::Confirmed(order)) => {
            info!("   Order ID: {}", order.id);
            info!("   Status: {}", order.status);
            info!("   Amount: {:.6}", order.quantity);

            if sandbox && !order.is_filled() {
                tokio::time::sleep(Duration::from_secs(2)).await;
                match gateway.cancel_order(&order.id, &settings.symbol).await {
                    Ok(()) => info!("✅ Test order cancelled (sandbox cleanup)"),
                    Err(e) => info!("   (Order may have filled immediately: {})", e),
                }
            }
        }
        Ok(Fill::Simulated { .. }) => {}
        Err(e) => error!("❌ Trade execution failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use trendguard_rs::config::{StrategyConfig, Timeframe};
    use trendguard_rs::data::Bar;
    use trendguard_rs::exchange::{GatewayError, OrderConfirmation, OrderStatus, Ticker};
    use trendguard_rs::portfolio::Balance;

    #[derive(Debug, Default)]
    struct Calls {
        ticker_fetches: usize,
        buys: Vec<f64>,
        cancels: Vec<String>,
    }

    /// Venue that answers every check and records orders and cancels
    struct ScriptedVenue {
        balances: Result<AccountBalances, GatewayError>,
        buy_status: OrderStatus,
        calls: Mutex<Calls>,
    }

    impl ScriptedVenue {
        fn new(buy_status: OrderStatus) -> Self {
            Self {
                balances: Ok(AccountBalances::new(vec![Balance::new("USD", 1000.0, 0.0)])),
                buy_status,
                calls: Mutex::new(Calls::default()),
            }
        }

        fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
            self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ExecutionGateway for ScriptedVenue {
        async fn fetch_bars(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _limit: usize,
        ) -> Result<Vec<Bar>, GatewayError> {
            Ok(Vec::new())
        }

        async fn fetch_balances(&self) -> Result<AccountBalances, GatewayError> {
            self.balances.clone()
        }

        async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, GatewayError> {
            self.calls().ticker_fetches += 1;
            Ok(Ticker {
                symbol: symbol.to_string(),
                last: 100.0,
                bid: None,
                ask: None,
            })
        }

        async fn submit_market_buy(
            &self,
            _symbol: &str,
            quantity: f64,
        ) -> Result<OrderConfirmation, GatewayError> {
            let mut calls = self.calls();
            calls.buys.push(quantity);
            let id = format!("test-{}", calls.buys.len());
            Ok(OrderConfirmation::new(id, self.buy_status.clone(), OrderSide::Buy, quantity))
        }

        async fn submit_market_sell(
            &self,
            _symbol: &str,
            _quantity: f64,
        ) -> Result<OrderConfirmation, GatewayError> {
            Err(GatewayError::Unsupported("selling in diagnostics"))
        }

        async fn load_products(&self) -> Result<Vec<ProductInfo>, GatewayError> {
            Ok(products())
        }

        async fn cancel_order(&self, order_id: &str, _symbol: &str) -> Result<(), GatewayError> {
            self.calls().cancels.push(order_id.to_string());
            Ok(())
        }
    }

    fn products() -> Vec<ProductInfo> {
        vec![ProductInfo {
            id: "ETH-USD".to_string(),
            symbol: "ETH/USD".to_string(),
            display_name: Some("ETH-USD".to_string()),
            trading_disabled: false,
        }]
    }

    fn settings(trading_enabled: bool) -> TraderSettings {
        TraderSettings {
            trading_enabled,
            ..TraderSettings::default()
        }
    }

    async fn run_checks(venue: &ScriptedVenue, trading_enabled: bool) -> Result<()> {
        let strategy = TrendFollower::new(StrategyConfig::default()).unwrap();
        run(venue, &strategy, &settings(trading_enabled), &products(), true).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_trading_submits_nothing() {
        let venue = ScriptedVenue::new(OrderStatus::Pending);

        run_checks(&venue, false).await.unwrap();

        let calls = venue.calls();
        assert_eq!(calls.ticker_fetches, 1);
        assert!(calls.buys.is_empty());
        assert!(calls.cancels.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unfilled_sandbox_order_is_cancelled() {
        let venue = ScriptedVenue::new(OrderStatus::Pending);

        run_checks(&venue, true).await.unwrap();

        let calls = venue.calls();
        // 1000 USD * 0.20 risk * 5x leverage / 100
        assert_eq!(calls.buys, vec![10.0]);
        assert_eq!(calls.cancels, vec!["test-1".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filled_order_is_not_cancelled() {
        let venue = ScriptedVenue::new(OrderStatus::Filled);

        run_checks(&venue, true).await.unwrap();

        let calls = venue.calls();
        assert_eq!(calls.buys.len(), 1);
        assert!(calls.cancels.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_balance_failure_skips_trade_check() {
        let mut venue = ScriptedVenue::new(OrderStatus::Pending);
        venue.balances = Err(GatewayError::Auth {
            status: 401,
            message: "invalid signature".to_string(),
        });

        run_checks(&venue, true).await.unwrap();

        let calls = venue.calls();
        assert_eq!(calls.ticker_fetches, 0);
        assert!(calls.buys.is_empty());
        assert!(calls.cancels.is_empty());
    }
}
