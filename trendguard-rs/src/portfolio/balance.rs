//! Balance management

use crate::exchange::GatewayError;
use serde::{Deserialize, Serialize};

/// Quote currencies accepted as collateral, in order of preference
pub const COLLATERAL_CURRENCIES: [&str; 2] = ["USD", "USDC"];

/// Balance of one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency code (e.g., "USD")
    pub currency: String,
    /// Available for new orders
    pub free: f64,
    /// Held by open orders
    pub used: f64,
    /// Total balance
    pub total: f64,
}

impl Balance {
    /// Create new balance
    pub fn new(currency: impl Into<String>, free: f64, used: f64) -> Self {
        Self {
            currency: currency.into(),
            free,
            used,
            total: free + used,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0.0 && self.free == 0.0 && self.used == 0.0
    }
}

/// All balances of the trading account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountBalances {
    balances: Vec<Balance>,
}

impl AccountBalances {
    pub fn new(balances: Vec<Balance>) -> Self {
        Self { balances }
    }

    /// Balance for a currency code, case-insensitive
    pub fn get(&self, currency: &str) -> Option<&Balance> {
        self.balances
            .iter()
            .find(|b| b.currency.eq_ignore_ascii_case(currency))
    }

    /// Currencies holding anything at all
    pub fn non_empty(&self) -> impl Iterator<Item = &Balance> {
        self.balances.iter().filter(|b| !b.is_empty())
    }

    /// Free quote collateral: USD when it is funded, otherwise USDC
    pub fn free_collateral(&self) -> Result<f64, GatewayError> {
        let mut found = false;
        for currency in COLLATERAL_CURRENCIES {
            if let Some(balance) = self.get(currency) {
                found = true;
                if balance.free > 0.0 {
                    return Ok(balance.free);
                }
            }
        }
        if found {
            Ok(0.0)
        } else {
            Err(GatewayError::CollateralUnavailable)
        }
    }
}
