//! Connection and symbol checks run before the loop starts

use anyhow::{Context, Result};
use tracing::{error, info, warn};
use trendguard_rs::exchange::{CoinbaseClient, ExecutionGateway, GatewayError, ProductInfo, VenueEnvironment};

/// Load the product list; failure here is fatal
pub async fn connect<G>(gateway: &G, environment: VenueEnvironment) -> Result<Vec<ProductInfo>>
where
    G: ExecutionGateway + ?Sized,
{
    info!("🔌 Connecting to {}...", environment.label());

    match gateway.load_products().await {
        Ok(products) => {
            info!("✅ Connected to Coinbase Exchange ({} products)", products.len());
            Ok(products)
        }
        Err(e) => {
            error!("❌ Connection Error: {}", e);
            if e.is_auth() {
                error!("Note: Coinbase Exchange requires API Key, Secret, and Passphrase.");
            }
            Err(e).context("could not reach the venue")
        }
    }
}

/// Product for `symbol` ("ETH/USD" or "ETH-USD")
pub fn find_product<'a>(products: &'a [ProductInfo], symbol: &str) -> Option<&'a ProductInfo> {
    let product_id = CoinbaseClient::product_id(symbol);
    products
        .iter()
        .find(|p| p.symbol.eq_ignore_ascii_case(symbol) || p.id.eq_ignore_ascii_case(&product_id))
}

/// Up to `limit` listed symbols sharing the base asset
pub fn similar_symbols<'a>(products: &'a [ProductInfo], base: &str, limit: usize) -> Vec<&'a str> {
    products
        .iter()
        .filter(|p| p.symbol.split('/').next().is_some_and(|b| b.eq_ignore_ascii_case(base)))
        .take(limit)
        .map(|p| p.symbol.as_str())
        .collect()
}

/// The traded symbol must be listed and enabled
pub fn require_symbol<'a>(
    products: &'a [ProductInfo],
    symbol: &str,
    base: &str,
) -> Result<&'a ProductInfo> {
    match find_product(products, symbol) {
        Some(product) if !product.trading_disabled => {
            info!(
                "✅ Symbol {} is available ({})",
                symbol,
                product.display_name.as_deref().unwrap_or("N/A")
            );
            Ok(product)
        }
        Some(_) => {
            error!("❌ Trading is disabled for {}", symbol);
            Err(GatewayError::UnknownSymbol(symbol.to_string()).into())
        }
        None => {
            warn!("⚠️  Symbol {} not found in available markets", symbol);
            warn!("   Available {} pairs: {:?}", base, similar_symbols(products, base, 10));
            Err(GatewayError::UnknownSymbol(symbol.to_string()).into())
        }
    }
}

/// Leverage failures only warn; the loop runs either way
pub async fn apply_leverage<G>(gateway: &G, leverage: f64, symbol: &str)
where
    G: ExecutionGateway + ?Sized,
{
    match gateway.set_leverage(leverage, symbol).await {
        Ok(()) => info!("⚡ Leverage set to {}x.", leverage),
        Err(e) => {
            warn!("⚠️  Could not set leverage automatically: {}", e);
            warn!("⚠️  Ensure leverage is set manually on the account, or use spot trading.");
        }
    }
}
