use thiserror::Error;

/// Invalid or missing configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("risk fraction must be in (0, 1], got {0}")]
    RiskFraction(f64),

    #[error("leverage must be a finite value >= 1, got {0}")]
    Leverage(f64),

    #[error("volatility multiplier must be a finite value > 0, got {0}")]
    VolatilityMultiplier(f64),

    #[error("minimum bar count must be at least {required}, got {actual}")]
    MinBars { required: usize, actual: usize },

    #[error("minimum order cost must be a finite value >= 0, got {0}")]
    MinOrderCost(f64),

    #[error("unsupported timeframe '{0}' (expected one of 1m, 5m, 15m, 1h, 6h, 1d)")]
    Timeframe(String),

    #[error("symbol '{0}' must look like BASE/QUOTE")]
    Symbol(String),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidVar { name: String, reason: String },
}
