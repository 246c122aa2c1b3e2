//! Coinbase Exchange REST client

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use reqwest::{Method, Response, StatusCode};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Timeframe;
use crate::data::{Bar, BarSeries};
use crate::exchange::{
    Credentials, ExecutionGateway, GatewayError, OrderConfirmation, OrderSide, OrderStatus,
    ProductInfo, Ticker,
};
use crate::portfolio::{AccountBalances, Balance};
use crate::Result;

/// The venue never returns more candles than this per request
pub const MAX_CANDLES_PER_REQUEST: usize = 300;

/// Order sizes are truncated to this many decimals
pub const QUANTITY_DECIMALS: u32 = 8;

/// Which Coinbase Exchange deployment to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueEnvironment {
    Production,
    Sandbox,
}

impl VenueEnvironment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Self::Sandbox
        } else {
            Self::Production
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.exchange.coinbase.com",
            Self::Sandbox => "https://api-public.sandbox.exchange.coinbase.com",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Production => "PRODUCTION",
            Self::Sandbox => "SANDBOX",
        }
    }
}

/// Coinbase Exchange client
pub struct CoinbaseClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl CoinbaseClient {
    /// Create new client for a deployment
    pub fn new(credentials: Credentials, environment: VenueEnvironment) -> Result<Self> {
        Self::with_base_url(credentials, environment.base_url())
    }

    /// Create a client against an explicit base URL
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trendguard/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// "ETH/USD" -> "ETH-USD"
    pub fn product_id(symbol: &str) -> String {
        symbol.trim().replace('/', "-").to_uppercase()
    }

    async fn public_get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<T, GatewayError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }

    async fn private_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<T, GatewayError> {
        if !self.credentials.is_configured() {
            return Err(GatewayError::Credentials(
                "COINBASE_API_KEY and COINBASE_API_SECRET must be set".to_string(),
            ));
        }

        let body = match body {
            Some(value) => serde_json::to_string(&value)?,
            None => String::new(),
        };
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self
            .credentials
            .sign(&timestamp, method.as_str(), path, &body)?;

        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("CB-ACCESS-KEY", &self.credentials.api_key)
            .header("CB-ACCESS-SIGN", signature)
            .header("CB-ACCESS-TIMESTAMP", timestamp)
            .header("CB-ACCESS-PASSPHRASE", &self.credentials.passphrase);
        if !body.is_empty() {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        read_json(request.send().await?).await
    }

    async fn submit_market_order(
        &self,
        side: OrderSide,
        symbol: &str,
        quantity: f64,
    ) -> std::result::Result<OrderConfirmation, GatewayError> {
        let size = format_quantity(quantity)?;
        let body = serde_json::json!({
            "type": "market",
            "side": side.as_str(),
            "product_id": Self::product_id(symbol),
            "size": size,
            "client_oid": uuid::Uuid::new_v4().to_string(),
        });
        debug!("Submitting {} {} {}", side, size, symbol);

        let order: CoinbaseOrder = self.private_request(Method::POST, "/orders", Some(body)).await?;
        Ok(OrderConfirmation::new(
            order.id,
            OrderStatus::from_venue(&order.status),
            side,
            quantity,
        ))
    }
}

#[async_trait]
impl ExecutionGateway for CoinbaseClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> std::result::Result<Vec<Bar>, GatewayError> {
        let limit = limit.clamp(1, MAX_CANDLES_PER_REQUEST);
        let granularity = timeframe.granularity_secs();
        let end = Utc::now();
        let start = end - ChronoDuration::seconds((granularity * limit as u64) as i64);

        let path = format!("/products/{}/candles", Self::product_id(symbol));
        let rows: Vec<CandleRow> = self
            .public_get(
                &path,
                &[
                    ("granularity", granularity.to_string()),
                    ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ],
            )
            .await?;

        Ok(bars_from_rows(rows, limit))
    }

    async fn fetch_balances(&self) -> std::result::Result<AccountBalances, GatewayError> {
        let accounts: Vec<CoinbaseAccount> =
            self.private_request(Method::GET, "/accounts", None).await?;
        balances_from_accounts(accounts)
    }

    async fn fetch_ticker(&self, symbol: &str) -> std::result::Result<Ticker, GatewayError> {
        let path = format!("/products/{}/ticker", Self::product_id(symbol));
        let ticker: CoinbaseTicker = self.public_get(&path, &[]).await?;

        Ok(Ticker {
            symbol: symbol.to_string(),
            last: parse_amount("price", &ticker.price)?,
            bid: ticker.bid.as_deref().map(|v| parse_amount("bid", v)).transpose()?,
            ask: ticker.ask.as_deref().map(|v| parse_amount("ask", v)).transpose()?,
        })
    }

    async fn submit_market_buy(
        &self,
        symbol: &str,
        quantity: f64,
    ) -> std::result::Result<OrderConfirmation, GatewayError> {
        self.submit_market_order(OrderSide::Buy, symbol, quantity).await
    }

    async fn submit_market_sell(
        &self,
        symbol: &str,
        quantity: f64,
    ) -> std::result::Result<OrderConfirmation, GatewayError> {
        self.submit_market_order(OrderSide::Sell, symbol, quantity).await
    }

    async fn load_products(&self) -> std::result::Result<Vec<ProductInfo>, GatewayError> {
        let products: Vec<CoinbaseProduct> = self.public_get("/products", &[]).await?;
        Ok(products.into_iter().map(ProductInfo::from).collect())
    }

    async fn cancel_order(&self, order_id: &str, symbol: &str) -> std::result::Result<(), GatewayError> {
        let path = format!(
            "/orders/{}?product_id={}",
            order_id,
            Self::product_id(symbol)
        );
        let _cancelled: serde_json::Value = self.private_request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

/// `[time, low, high, open, close, volume]`, newest first on the wire
type CandleRow = [f64; 6];

#[derive(Debug, Deserialize)]
struct CoinbaseAccount {
    currency: String,
    available: String,
    hold: String,
}

#[derive(Debug, Deserialize)]
struct CoinbaseOrder {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct CoinbaseTicker {
    price: String,
    #[serde(default)]
    bid: Option<String>,
    #[serde(default)]
    ask: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CoinbaseProduct {
    id: String,
    base_currency: String,
    quote_currency: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    trading_disabled: bool,
}

#[derive(Debug, Deserialize)]
struct CoinbaseErrorBody {
    message: String,
}

impl From<CoinbaseProduct> for ProductInfo {
    fn from(product: CoinbaseProduct) -> Self {
        Self {
            symbol: format!("{}/{}", product.base_currency, product.quote_currency),
            id: product.id,
            display_name: product.display_name,
            trading_disabled: product.trading_disabled,
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> std::result::Result<T, GatewayError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        return serde_json::from_str(&text).map_err(GatewayError::from);
    }

    let message = serde_json::from_str::<CoinbaseErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth {
            status: status.as_u16(),
            message,
        },
        _ => GatewayError::Venue {
            status: status.as_u16(),
            message,
        },
    })
}

/// Re-order candle rows oldest first and keep the latest `limit`
fn bars_from_rows(rows: Vec<CandleRow>, limit: usize) -> Vec<Bar> {
    let mut series = BarSeries::from_vec(
        rows.into_iter()
            .filter_map(|[time, low, high, open, close, volume]| {
                let bar = Bar::from_unix(time as i64, open, high, low, close, volume);
                if bar.is_none() {
                    warn!("Dropping candle with invalid timestamp {}", time);
                }
                bar
            })
            .collect(),
    );
    series.sort_by_time();
    series.truncate_to_latest(limit);
    series.into_vec()
}

fn balances_from_accounts(
    accounts: Vec<CoinbaseAccount>,
) -> std::result::Result<AccountBalances, GatewayError> {
    let balances = accounts
        .into_iter()
        .map(|account| {
            let free = parse_amount("available", &account.available)?;
            let used = parse_amount("hold", &account.hold)?;
            Ok(Balance::new(account.currency, free, used))
        })
        .collect::<std::result::Result<Vec<_>, GatewayError>>()?;
    Ok(AccountBalances::new(balances))
}

fn parse_amount(field: &str, value: &str) -> std::result::Result<f64, GatewayError> {
    Decimal::from_str(value.trim())
        .ok()
        .and_then(|d| d.to_f64())
        .ok_or_else(|| GatewayError::Decode(format!("{} is not a number: '{}'", field, value)))
}

/// Truncate (never round up) to the venue's precision
fn format_quantity(quantity: f64) -> std::result::Result<String, GatewayError> {
    let truncated = Decimal::from_f64(quantity)
        .filter(|_| quantity.is_finite() && quantity > 0.0)
        .map(|d| d.round_dp_with_strategy(QUANTITY_DECIMALS, RoundingStrategy::ToZero))
        .filter(|d| !d.is_zero())
        .ok_or(GatewayError::InvalidQuantity(quantity))?;
    Ok(truncated.normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id() {
        assert_eq!(CoinbaseClient::product_id("eth/usd"), "ETH-USD");
        assert_eq!(CoinbaseClient::product_id("BTC-USD"), "BTC-USD");
    }

    #[test]
    fn test_bars_reordered_and_limited() {
        let rows: Vec<CandleRow> = vec![
            [1_700_000_600.0, 9.0, 12.0, 10.0, 11.0, 5.0],
            [1_700_000_300.0, 8.0, 11.0, 9.0, 10.0, 4.0],
            [1_700_000_000.0, 7.0, 10.0, 8.0, 9.0, 3.0],
        ];
        let bars = bars_from_rows(rows, 2);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp.timestamp(), 1_700_000_300);
        assert_eq!(bars[1].timestamp.timestamp(), 1_700_000_600);
        // Wire order is low, high, open, close
        assert_eq!(bars[1].open, 10.0);
        assert_eq!(bars[1].high, 12.0);
        assert_eq!(bars[1].low, 9.0);
        assert_eq!(bars[1].close, 11.0);
        assert_eq!(bars[1].volume, 5.0);
    }

    #[test]
    fn test_candle_rows_deserialize() {
        let json = "[[1700000300, 8.5, 11, 9, 10.25, 42.1]]";
        let rows: Vec<CandleRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0][4], 10.25);
    }

    #[test]
    fn test_balances_from_accounts() {
        let json = r#"[
            {"id": "a", "currency": "USD", "balance": "150.50", "available": "120.25", "hold": "30.25", "profile_id": "p"},
            {"id": "b", "currency": "ETH", "balance": "0.0000000000", "available": "0", "hold": "0.0000000000", "profile_id": "p"}
        ]"#;
        let accounts: Vec<CoinbaseAccount> = serde_json::from_str(json).unwrap();
        let balances = balances_from_accounts(accounts).unwrap();

        assert_eq!(balances.free_collateral().unwrap(), 120.25);
        assert_eq!(balances.get("USD").unwrap().total, 150.5);
        assert_eq!(balances.non_empty().count(), 1);
    }

    #[test]
    fn test_bad_amount_is_decode_error() {
        assert!(matches!(
            parse_amount("available", "lots"),
            Err(GatewayError::Decode(_))
        ));
    }

    #[test]
    fn test_format_quantity_truncates() {
        assert_eq!(format_quantity(9.090909090909).unwrap(), "9.09090909");
        assert_eq!(format_quantity(0.123456789).unwrap(), "0.12345678");
        assert_eq!(format_quantity(2.0).unwrap(), "2");
        assert!(format_quantity(0.000000001).is_err());
        assert!(format_quantity(0.0).is_err());
        assert!(format_quantity(f64::NAN).is_err());
    }

    #[test]
    fn test_product_conversion() {
        let json = r#"{"id": "ETH-USD", "base_currency": "ETH", "quote_currency": "USD", "display_name": "ETH-USD", "status": "online"}"#;
        let product: ProductInfo = serde_json::from_str::<CoinbaseProduct>(json).unwrap().into();
        assert_eq!(product.symbol, "ETH/USD");
        assert!(!product.trading_disabled);
    }
}
