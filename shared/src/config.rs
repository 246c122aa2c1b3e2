use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;
use trendguard_rs::config::{StrategyConfig, Timeframe, TraderSettings};
use trendguard_rs::exchange::Credentials;
use trendguard_rs::strategy::MIN_BARS;

pub use trendguard_rs::config::ConfigError;

/// Process configuration, read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub leverage: f64,
    pub risk_pct: f64,
    pub atr_multiplier: f64,
    pub check_interval: Duration,
    pub bar_limit: usize,
    pub min_order_size: f64,
    pub credentials: Credentials,
}

impl Config {
    /// Load the env files from the working directory, then read the environment.
    pub fn from_env(sandbox: bool) -> Result<Self, ConfigError> {
        Self::from_env_dir(Path::new("."), sandbox)
    }

    /// Load `.env.sandbox` or `.env.production` from `dir`, then `dir/.env`, then read
    /// the environment.
    ///
    /// dotenv never overwrites a variable that is already set, so the process
    /// environment wins over the venue file, which wins over `.env`.
    pub fn from_env_dir(dir: &Path, sandbox: bool) -> Result<Self, ConfigError> {
        let venue_file = if sandbox { ".env.sandbox" } else { ".env.production" };
        for name in [venue_file, ".env"] {
            let path = dir.join(name);
            match dotenv::from_path(&path) {
                Ok(()) => debug!("Loaded {}", path.display()),
                Err(_) => debug!("No {} file", path.display()),
            }
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeframe = match var("TRADING_TIMEFRAME") {
            Some(raw) => raw.parse()?,
            None => Timeframe::FiveMinutes,
        };
        let secret = var("COINBASE_API_SECRET")
            .map(|s| s.replace("\\n", "\n"))
            .unwrap_or_default();

        let config = Config {
            symbol: var("TRADING_SYMBOL")
                .map(|s| s.trim().to_uppercase())
                .unwrap_or_else(|| "ETH/USD".to_string()),
            timeframe,
            leverage: parse_var(&var, "TRADING_LEVERAGE", 5.0)?,
            risk_pct: parse_var(&var, "TRADING_RISK_PCT", 0.20)?,
            atr_multiplier: parse_var(&var, "TRADING_ATR_MULTIPLIER", 1.5)?,
            check_interval: Duration::from_secs(parse_var(&var, "TRADING_CHECK_INTERVAL", 60)?),
            bar_limit: parse_var(&var, "TRADING_BAR_LIMIT", 100)?,
            min_order_size: parse_var(&var, "TRADING_MIN_ORDER_SIZE", 0.0)?,
            credentials: Credentials::new(
                var("COINBASE_API_KEY").unwrap_or_default(),
                secret,
                var("COINBASE_API_PASSPHRASE").unwrap_or_default(),
            ),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy_config().validate()?;
        self.trader_settings(false).validate()?;
        if self.bar_limit < MIN_BARS {
            return Err(ConfigError::MinBars {
                required: MIN_BARS,
                actual: self.bar_limit,
            });
        }
        Ok(())
    }

    pub fn strategy_config(&self) -> StrategyConfig {
        StrategyConfig {
            risk_fraction: self.risk_pct,
            leverage: self.leverage,
            volatility_multiplier: self.atr_multiplier,
            min_bars: MIN_BARS,
            min_order_cost: self.min_order_size,
        }
    }

    pub fn trader_settings(&self, trading_enabled: bool) -> TraderSettings {
        TraderSettings {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe,
            bar_limit: self.bar_limit,
            poll_interval: self.check_interval,
            trading_enabled,
        }
    }

    pub fn credentials(&self) -> Credentials {
        self.credentials.clone()
    }
}

fn parse_var<T, F>(var: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            name: name.to_string(),
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.symbol, "ETH/USD");
        assert_eq!(config.timeframe, Timeframe::FiveMinutes);
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.strategy_config(), StrategyConfig::default());
        assert!(!config.credentials.is_configured());

        let settings = config.trader_settings(true);
        assert!(settings.trading_enabled);
        assert_eq!(settings.bar_limit, 100);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TRADING_SYMBOL", "btc/usd"),
            ("TRADING_TIMEFRAME", "1h"),
            ("TRADING_LEVERAGE", "3"),
            ("TRADING_RISK_PCT", "0.1"),
            ("TRADING_ATR_MULTIPLIER", "2.0"),
            ("TRADING_CHECK_INTERVAL", "30"),
            ("TRADING_MIN_ORDER_SIZE", "1.00"),
            ("COINBASE_API_KEY", "key"),
            ("COINBASE_API_SECRET", "line1\\nline2"),
            ("TRADING_BAR_LIMIT", " "),
        ]))
        .unwrap();

        assert_eq!(config.symbol, "BTC/USD");
        assert_eq!(config.timeframe, Timeframe::OneHour);
        assert_eq!(config.leverage, 3.0);
        assert_eq!(config.risk_pct, 0.1);
        assert_eq!(config.check_interval, Duration::from_secs(30));
        assert_eq!(config.strategy_config().min_order_cost, 1.0);
        assert_eq!(config.credentials.api_secret, "line1\nline2");
        // Blank falls back to the default
        assert_eq!(config.bar_limit, 100);
    }

    #[test]
    fn test_venue_file_overrides_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "TRADING_SYMBOL=SOL/USD\nTRADING_TIMEFRAME=1h\n",
        )
        .unwrap();
        std::fs::write(dir.path().join(".env.sandbox"), "TRADING_SYMBOL=BTC/USD\n").unwrap();
        std::fs::write(dir.path().join(".env.production"), "TRADING_SYMBOL=ADA/USD\n").unwrap();

        // The only test in this crate that touches the process environment
        let config = Config::from_env_dir(dir.path(), true).unwrap();

        assert_eq!(config.symbol, "BTC/USD");
        // Still picked up from .env
        assert_eq!(config.timeframe, Timeframe::OneHour);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup(&[("TRADING_LEVERAGE", "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar { ref name, .. } if name == "TRADING_LEVERAGE"));

        let err = Config::from_lookup(lookup(&[("TRADING_RISK_PCT", "20")])).unwrap_err();
        assert_eq!(err, ConfigError::RiskFraction(20.0));

        let err = Config::from_lookup(lookup(&[("TRADING_TIMEFRAME", "2h")])).unwrap_err();
        assert_eq!(err, ConfigError::Timeframe("2h".to_string()));

        let err = Config::from_lookup(lookup(&[("TRADING_CHECK_INTERVAL", "0")])).unwrap_err();
        assert_eq!(err, ConfigError::NotPositive("poll interval"));

        let err = Config::from_lookup(lookup(&[("TRADING_BAR_LIMIT", "10")])).unwrap_err();
        assert_eq!(err, ConfigError::MinBars { required: 20, actual: 10 });
    }
}
