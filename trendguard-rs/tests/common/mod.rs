//! Scripted in-memory gateway and bar fixtures shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use trendguard_rs::config::Timeframe;
use trendguard_rs::data::Bar;
use trendguard_rs::exchange::{
    ExecutionGateway, GatewayError, OrderConfirmation, OrderSide, OrderStatus, ProductInfo, Ticker,
};
use trendguard_rs::portfolio::{AccountBalances, Balance};

#[derive(Debug)]
pub struct MockState {
    /// One entry per `fetch_bars` call; empty queue answers with no bars
    pub bars: VecDeque<Result<Vec<Bar>, GatewayError>>,
    pub balances: Result<AccountBalances, GatewayError>,
    pub failing_buys: usize,
    pub failing_sells: usize,
    pub buys: Vec<f64>,
    pub sells: Vec<f64>,
    pub order_attempts: usize,
    pub bar_fetches: usize,
    pub balance_fetches: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            bars: VecDeque::new(),
            balances: Ok(AccountBalances::default()),
            failing_buys: 0,
            failing_sells: 0,
            buys: Vec::new(),
            sells: Vec::new(),
            order_attempts: 0,
            bar_fetches: 0,
            balance_fetches: 0,
        }
    }
}

/// Cloning shares the state, so a test keeps a handle after moving one into a `Trader`
#[derive(Debug, Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn with_collateral(usd: f64) -> Self {
        let gateway = Self::default();
        gateway.set_collateral(usd);
        gateway
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn set_collateral(&self, usd: f64) {
        self.state().balances = Ok(AccountBalances::new(vec![Balance::new("USD", usd, 0.0)]));
    }

    pub fn fail_balances(&self, error: GatewayError) {
        self.state().balances = Err(error);
    }

    pub fn push_bars(&self, bars: Vec<Bar>) {
        self.state().bars.push_back(Ok(bars));
    }

    pub fn push_bar_error(&self, error: GatewayError) {
        self.state().bars.push_back(Err(error));
    }

    pub fn fail_next_buys(&self, count: usize) {
        self.state().failing_buys = count;
    }

    pub fn fail_next_sells(&self, count: usize) {
        self.state().failing_sells = count;
    }

    pub fn buys(&self) -> Vec<f64> {
        self.state().buys.clone()
    }

    pub fn sells(&self) -> Vec<f64> {
        self.state().sells.clone()
    }

    pub fn order_attempts(&self) -> usize {
        self.state().order_attempts
    }

    pub fn bar_fetches(&self) -> usize {
        self.state().bar_fetches
    }

    pub fn balance_fetches(&self) -> usize {
        self.state().balance_fetches
    }

    fn fill(&self, side: OrderSide, quantity: f64) -> Result<OrderConfirmation, GatewayError> {
        let mut state = self.state();
        state.order_attempts += 1;

        let failing = match side {
            OrderSide::Buy => &mut state.failing_buys,
            OrderSide::Sell => &mut state.failing_sells,
        };
        if *failing > 0 {
            *failing -= 1;
            return Err(GatewayError::Venue {
                status: 400,
                message: "Insufficient funds".to_string(),
            });
        }

        match side {
            OrderSide::Buy => state.buys.push(quantity),
            OrderSide::Sell => state.sells.push(quantity),
        }
        let id = format!("order-{}", state.order_attempts);
        Ok(OrderConfirmation::new(id, OrderStatus::Pending, side, quantity))
    }
}

#[async_trait]
impl ExecutionGateway for MockGateway {
    async fn fetch_bars(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, GatewayError> {
        let mut state = self.state();
        state.bar_fetches += 1;
        let mut bars = state.bars.pop_front().unwrap_or_else(|| Ok(Vec::new()))?;
        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
        }
        Ok(bars)
    }

    async fn fetch_balances(&self) -> Result<AccountBalances, GatewayError> {
        let mut state = self.state();
        state.balance_fetches += 1;
        state.balances.clone()
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, GatewayError> {
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
        self.fill(OrderSide::Buy, quantity)
    }

    async fn submit_market_sell(
        &self,
        _symbol: &str,
        quantity: f64,
    ) -> Result<OrderConfirmation, GatewayError> {
        self.fill(OrderSide::Sell, quantity)
    }

    async fn load_products(&self) -> Result<Vec<ProductInfo>, GatewayError> {
        Ok(vec![ProductInfo {
            id: "ETH-USD".to_string(),
            symbol: "ETH/USD".to_string(),
            display_name: Some("ETH-USD".to_string()),
            trading_disabled: false,
        }])
    }

    async fn cancel_order(&self, _order_id: &str, _symbol: &str) -> Result<(), GatewayError> {
        Ok(())
    }
}

/// Rising closes (up one per bar, every third bar gives back 1.5)
pub fn trending_bars(count: usize) -> Vec<Bar> {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    (0..count)
        .map(|i| {
            let close = 100.0 + i as f64 - if i % 3 == 2 { 1.5 } else { 0.0 };
            Bar::new(
                start + Duration::minutes(5 * i as i64),
                close - 0.5,
                close + 1.0,
                close - 1.0,
                close,
                10.0,
            )
        })
        .collect()
}

/// `bars` followed by one bar that closes at `close`
pub fn with_crash(mut bars: Vec<Bar>, close: f64) -> Vec<Bar> {
    let last = *bars.last().unwrap();
    bars.push(Bar::new(
        last.timestamp + Duration::minutes(5),
        last.close,
        last.close,
        close - 1.0,
        close,
        50.0,
    ));
    bars
}
