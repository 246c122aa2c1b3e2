//! EMA trend filter

use crate::indicators::{invalid_period, Indicator, WarmUp};
use crate::Result;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

/// Exponential moving average of closes; reads after `period` closes
#[derive(Debug, Clone)]
pub struct EMA {
    inner: ExponentialMovingAverage,
    period: usize,
    warm_up: WarmUp,
    last: Option<f64>,
}

impl EMA {
    pub fn new(period: usize) -> Result<Self> {
        let inner = ExponentialMovingAverage::new(period).map_err(|e| invalid_period("EMA", period, e))?;
        Ok(Self {
            inner,
            period,
            warm_up: WarmUp::new(period),
            last: None,
        })
    }
}

impl Indicator for EMA {
    type Input = f64;

    fn name(&self) -> &'static str {
        "EMA"
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
