//! Signal calculation from a bar window

use crate::data::Bar;
use crate::indicators::{Indicator, ATR, EMA, RSI};
use crate::strategy::{MarketSnapshot, MIN_BARS, MOMENTUM_PERIOD, TREND_PERIOD, VOLATILITY_PERIOD};
use crate::Result;
use tracing::debug;

/// Computes EMA / RSI / ATR over a window and validates the latest readings
#[derive(Debug, Clone)]
pub struct SignalCalculator {
    min_bars: usize,
    trend: EMA,
    momentum: RSI,
    volatility: ATR,
}

impl SignalCalculator {
    pub fn new(min_bars: usize) -> Result<Self> {
        Ok(Self {
            min_bars: min_bars.max(MIN_BARS),
            trend: EMA::new(TREND_PERIOD)?,
            momentum: RSI::new(MOMENTUM_PERIOD)?,
            volatility: ATR::new(VOLATILITY_PERIOD)?,
        })
    }

    pub fn min_bars(&self) -> usize {
        self.min_bars
    }

    /// Snapshot of the latest bar, or `None` when the window is too short,
    /// an indicator has not warmed up, or any reading is out of range.
    ///
    /// `bars` must be ordered oldest first. Each call starts from fresh
    /// indicator state, so the result depends on `bars` alone.
    pub fn analyze(&self, bars: &[Bar]) -> Option<MarketSnapshot> {
        if bars.len() < self.min_bars {
            debug!("Need {} bars, have {}", self.min_bars, bars.len());
            return None;
        }

        let mut trend = self.trend.clone();
        let mut momentum = self.momentum.clone();
        let mut volatility = self.volatility.clone();

        for bar in bars {
            trend.update(bar.close);
            momentum.update(bar.close);
            volatility.update(*bar);
        }

        debug!(
            "Readings over {} bars: {} {} {}",
            bars.len(),
            trend.describe(),
            momentum.describe(),
            volatility.describe()
        );

        let price = bars.last()?.close;
        let snapshot = MarketSnapshot::new(
            price,
            trend.value()?,
            momentum.value()?,
            volatility.value()?,
        );
        if snapshot.is_none() {
            debug!("Discarding out-of-range readings at price {}", price);
        }
        snapshot
    }
}
