//! Technical indicators module
//!
//! Thin wrappers over the `ta` crate that hold back readings until the
//! indicator has seen enough input to mean something.

pub mod atr;
pub mod ema;
pub mod rsi;

pub use atr::*;
pub use ema::*;
pub use rsi::*;

/// Indicator trait for all indicators
pub trait Indicator {
    /// What one update consumes (a close price, or a whole bar)
    type Input;

    fn name(&self) -> &'static str;

    fn period(&self) -> usize;

    /// Feed the next input, oldest first
    fn update(&mut self, input: Self::Input);

    /// Latest reading, `None` while warming up
    fn value(&self) -> Option<f64>;

    fn is_ready(&self) -> bool {
        self.value().is_some()
    }

    /// `EMA(20)=101.2500`, or `EMA(20)=warming up`
    fn describe(&self) -> String {
        match self.value() {
            Some(v) => format!("{}({})={:.4}", self.name(), self.period(), v),
            None => format!("{}({})=warming up", self.name(), self.period()),
        }
    }
}

/// Gates raw `ta` outputs until `needed` inputs have been observed
#[derive(Debug, Clone)]
pub(crate) struct WarmUp {
    needed: usize,
    seen: usize,
}

impl WarmUp {
    pub(crate) fn new(needed: usize) -> Self {
        Self { needed, seen: 0 }
    }

    pub(crate) fn gate(&mut self, raw: f64) -> Option<f64> {
        self.seen = self.seen.saturating_add(1);
        (self.seen >= self.needed).then_some(raw)
    }
}

/// Map a `ta` construction error into our error type
pub(crate) fn invalid_period(indicator: &str, period: usize, err: ta::errors::TaError) -> anyhow::Error {
    anyhow::anyhow!("invalid {} period {}: {:?}", indicator, period, err)
}
