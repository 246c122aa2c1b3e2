//! ATR volatility measure

use crate::data::Bar;
use crate::indicators::{invalid_period, Indicator, WarmUp};
use crate::Result;
use ta::indicators::AverageTrueRange;
use ta::Next;

/// Average true range, fed whole bars
#[derive(Debug, Clone)]
pub struct ATR {
    inner: AverageTrueRange,
    period: usize,
    warm_up: WarmUp,
    last: Option<f64>,
}

impl ATR {
    pub fn new(period: usize) -> Result<Self> {
        let inner = AverageTrueRange::new(period).map_err(|e| invalid_period("ATR", period, e))?;
        Ok(Self {
            inner,
            period,
            // true range needs the previous close
            warm_up: WarmUp::new(period + 1),
            last: None,
        })
    }
}

impl Indicator for ATR {
    type Input = Bar;

    fn name(&self) -> &'static str {
        "ATR"
    }

    fn period(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: Bar) {
        self.last = self.warm_up.gate(self.inner.next(&bar));
    }

    fn value(&self) -> Option<f64> {
        self.last
    }
}
