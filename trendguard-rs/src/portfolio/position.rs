//! Position tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat/long state of the single tracked position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeState {
    /// No exposure
    Flat,
    /// Holding `quantity` under a trailing stop
    Long,
}

impl fmt::Display for TradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => f.write_str("FLAT"),
            Self::Long => f.write_str("LONG"),
        }
    }
}

/// The one position the process trades.
///
/// Fields are private so a closed position can only ever be `{false, 0, 0}`: the only
/// ways to build one are [`Position::flat`], [`Position::open`] and
/// [`Position::with_trailing_stop`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    is_open: bool,
    quantity: f64,
    trailing_stop: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self::flat()
    }
}

impl Position {
    /// No position
    pub const fn flat() -> Self {
        Self {
            is_open: false,
            quantity: 0.0,
            trailing_stop: 0.0,
        }
    }

    /// Open position after a confirmed (or simulated) buy
    pub fn open(quantity: f64, trailing_stop: f64) -> Self {
        Self {
            is_open: true,
            quantity,
            trailing_stop,
        }
    }

    /// Same position with a different stop. A flat position stays flat.
    pub fn with_trailing_stop(self, trailing_stop: f64) -> Self {
        if self.is_open {
            Self {
                trailing_stop,
                ..self
            }
        } else {
            self
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn trailing_stop(&self) -> f64 {
        self.trailing_stop
    }

    pub fn state(&self) -> TradeState {
        if self.is_open {
            TradeState::Long
        } else {
            TradeState::Flat
        }
    }

    /// `is_open=false` implies zero quantity and zero stop
    pub fn is_consistent(&self) -> bool {
        if self.is_open {
            self.quantity.is_finite() && self.quantity > 0.0 && !self.trailing_stop.is_nan()
        } else {
            self.quantity == 0.0 && self.trailing_stop == 0.0
        }
    }
}
