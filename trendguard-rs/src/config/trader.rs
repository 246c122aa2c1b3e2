//! Runtime settings for the poll loop

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Bar interval supported by the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    SixHours,
    OneDay,
}

impl Timeframe {
    /// Bar length in seconds
    pub fn granularity_secs(&self) -> u64 {
        match self {
            Self::OneMinute => 60,
            Self::FiveMinutes => 300,
            Self::FifteenMinutes => 900,
            Self::OneHour => 3_600,
            Self::SixHours => 21_600,
            Self::OneDay => 86_400,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::OneDay => "1d",
        }
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Ok(Self::OneMinute),
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "1h" => Ok(Self::OneHour),
            "6h" => Ok(Self::SixHours),
            "1d" => Ok(Self::OneDay),
            other => Err(ConfigError::Timeframe(other.to_string())),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the poll loop needs besides the strategy itself
#[derive(Debug, Clone, PartialEq)]
pub struct TraderSettings {
    /// Instrument in BASE/QUOTE form (e.g., "ETH/USD")
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Bars requested per cycle
    pub bar_limit: usize,
    /// Delay between cycles, applied after errors too
    pub poll_interval: Duration,
    /// When false, orders are simulated instead of submitted
    pub trading_enabled: bool,
}

impl Default for TraderSettings {
    fn default() -> Self {
        Self {
            symbol: "ETH/USD".to_string(),
            timeframe: Timeframe::FiveMinutes,
            bar_limit: 100,
            poll_interval: Duration::from_secs(60),
            trading_enabled: false,
        }
    }
}

impl TraderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.symbol.split_once('/') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {}
            _ => return Err(ConfigError::Symbol(self.symbol.clone())),
        }
        if self.bar_limit == 0 {
            return Err(ConfigError::NotPositive("bar limit"));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::NotPositive("poll interval"));
        }
        Ok(())
    }

    /// Base asset of the symbol ("ETH" for "ETH/USD")
    pub fn base_asset(&self) -> &str {
        self.symbol.split('/').next().unwrap_or(&self.symbol)
    }
}
