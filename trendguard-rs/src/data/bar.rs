//! OHLCV bar data structures

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One sampling interval of price history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Interval open time
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Build a bar from a unix timestamp in seconds.
    ///
    /// Returns `None` when the timestamp is out of chrono's range.
    pub fn from_unix(
        seconds: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Option<Self> {
        let timestamp = Utc.timestamp_opt(seconds, 0).single()?;
        Some(Self::new(timestamp, open, high, low, close, volume))
    }

    /// Get total range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

impl ta::Open for Bar {
    fn open(&self) -> f64 {
        self.open
    }
}

impl ta::High for Bar {
    fn high(&self) -> f64 {
        self.high
    }
}

impl ta::Low for Bar {
    fn low(&self) -> f64 {
        self.low
    }
}

impl ta::Close for Bar {
    fn close(&self) -> f64 {
        self.close
    }
}

impl ta::Volume for Bar {
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Ordered window of bars, oldest first
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Create new empty series
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Create from vector of bars
    pub fn from_vec(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// Get number of bars
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if series is empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get last bar
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Get all bars
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Get close prices as vector
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Get high prices as vector
    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    /// Get low prices as vector
    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    /// Sort by timestamp (oldest first)
    pub fn sort_by_time(&mut self) {
        self.bars.sort_by_key(|b| b.timestamp);
    }

    /// Keep only the most recent `limit` bars
    pub fn truncate_to_latest(&mut self, limit: usize) {
        if self.bars.len() > limit {
            let excess = self.bars.len() - limit;
            self.bars.drain(..excess);
        }
    }

    /// Consume the series
    pub fn into_vec(self) -> Vec<Bar> {
        self.bars
    }
}

impl From<Vec<Bar>> for BarSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::from_vec(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_at(seconds: i64, close: f64) -> Bar {
        Bar::from_unix(seconds, close, close + 1.0, close - 1.0, close, 10.0).unwrap()
    }

    #[test]
    fn test_sort_and_truncate() {
        let mut series = BarSeries::from_vec(vec![bar_at(300, 3.0), bar_at(0, 1.0), bar_at(600, 4.0), bar_at(150, 2.0)]);
        series.sort_by_time();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0, 4.0]);

        series.truncate_to_latest(2);
        assert_eq!(series.closes(), vec![3.0, 4.0]);
        assert_eq!(series.last().unwrap().timestamp.timestamp(), 600);

        // Truncating to more than we have is a no-op
        series.truncate_to_latest(10);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_series_extraction() {
        let series = BarSeries::from(vec![bar_at(0, 10.0), bar_at(60, 12.0)]);
        assert_eq!(series.highs(), vec![11.0, 13.0]);
        assert_eq!(series.lows(), vec![9.0, 11.0]);
        assert_eq!(series.bars()[1].range(), 2.0);
    }
}
