//! RSI momentum gauge

use crate::indicators::{invalid_period, Indicator, WarmUp};
use crate::Result;
use ta::indicators::RelativeStrengthIndex;
use ta::Next;

/// Relative strength index of closes, 0..=100
#[derive(Debug, Clone)]
pub struct RSI {
    inner: RelativeStrengthIndex,
    period: usize,
    warm_up: WarmUp,
    last: Option<f64>,
}

impl RSI {
    pub fn new(period: usize) -> Result<Self> {
        let inner = RelativeStrengthIndex::new(period).map_err(|e| invalid_period("RSI", period, e))?;
        Ok(Self {
            inner,
            period,
            // period price changes need period + 1 closes
            warm_up: WarmUp::new(period + 1),
            last: None,
        })
    }
}

impl Indicator for RSI {
    type Input = f64;

    fn name(&self) -> &'static str {
        "RSI"
    }

    fn period(&self) -> usize {
        self.period
    }

    fn update(&mut self, close: f64) {
        self.last = self.warm_up.gate(self.inner.next(close));
    }

    fn value(&self) -> Option<f64> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_needs_period_plus_one() {
        let mut rsi = RSI::new(14).unwrap();
        for value in [100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0] {
            rsi.update(value);
        }
        assert_eq!(rsi.value(), None);

        for i in 0..8 {
            rsi.update(106.0 + i as f64);
        }
        assert!(rsi.is_ready());
    }

    #[test]
    fn test_rsi_bounded_on_rally() {
        let mut rsi = RSI::new(14).unwrap();
        for i in 0..30 {
            rsi.update(100.0 + i as f64 * 0.5 + (i % 3) as f64 * 0.2);
        }
        let last = rsi.value().unwrap();

        assert!(last > 50.0);
        assert!(last <= 100.0);
    }
}
