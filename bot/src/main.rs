use anyhow::{Context, Result};
use clap::Parser;
use shared::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trendguard_rs::exchange::{CoinbaseClient, VenueEnvironment};
use trendguard_rs::runner::Trader;
use trendguard_rs::strategy::TrendFollower;

mod diagnostics;
mod startup;
mod version;

/// Trend-following trader with an ATR trailing stop
#[derive(Parser, Debug)]
#[command(name = "trendguard", version, about)]
struct Args {
    /// Run every venue check once and exit (implies --sandbox)
    #[arg(short, long)]
    test: bool,

    /// Use the sandbox venue
    #[arg(short, long)]
    sandbox: bool,

    /// Submit real orders instead of simulating them
    #[arg(short, long)]
    execute: bool,
}

impl Args {
    fn use_sandbox(&self) -> bool {
        self.sandbox || self.test
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let sandbox = args.use_sandbox();
    info!("Starting TrendGuard {}", version::build_info());
    if args.test {
        info!("🧪 TEST MODE ENABLED");
    }

    let config = Config::from_env(sandbox).context("invalid configuration")?;
    let settings = config.trader_settings(args.execute);
    let strategy = TrendFollower::new(config.strategy_config())?;

    let environment = VenueEnvironment::from_sandbox_flag(sandbox);
    let client = CoinbaseClient::new(config.credentials(), environment)
        .context("failed to build the HTTP client")?;
    let products = startup::connect(&client, environment).await?;

    if args.test {
        return diagnostics::run(&client, &strategy, &settings, &products, sandbox).await;
    }

    startup::require_symbol(&products, &settings.symbol, settings.base_asset())?;
    startup::apply_leverage(&client, config.leverage, &settings.symbol).await;

    info!(
        "🛡️ Active. Risking {:.1}% of balance per trade on {} ({}).",
        config.risk_pct * 100.0,
        settings.symbol,
        settings.timeframe
    );
    info!("📉 Crash Protection: ATR Trailing Stop active.");
    if settings.trading_enabled {
        warn!("⚠️  TRADING ENABLED - Real orders will be executed!");
    } else {
        info!("ℹ️  Trading disabled - orders are simulated (use --execute to enable)");
    }

    let mut trader = Trader::new(client, strategy, settings);
    trader.run_until(tokio::signal::ctrl_c()).await?;

    info!("👋 Stopped after {} cycles", trader.cycles());
    Ok(())
}
