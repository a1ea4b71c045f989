use std::sync::Arc;

use replay_core::{Candle, CandleSeries};

/// Read-only view of the revealed prefix of a candle series.
///
/// Cheap to clone (shares the backing series) and immutable: each tick
/// publishes a fresh snapshot rather than mutating an old one, so a
/// consumer can never observe a half-advanced window.
#[derive(Debug, Clone)]
pub struct VisibleWindow {
    series: Arc<CandleSeries>,
    revealed: usize,
}

impl VisibleWindow {
    pub(crate) fn new(series: Arc<CandleSeries>, revealed: usize) -> Self {
        let revealed = revealed.min(series.len());
        Self { series, revealed }
    }

    pub fn empty() -> Self {
        Self {
            series: Arc::new(CandleSeries::default()),
            revealed: 0,
        }
    }

    /// How many leading candles are visible.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_empty(&self) -> bool {
        self.revealed == 0
    }

    /// True once the whole underlying series has been revealed.
    pub fn is_exhausted(&self) -> bool {
        self.revealed == self.series.len()
    }

    pub fn timestamps(&self) -> &[chrono::DateTime<chrono::Utc>] {
        &self.series.timestamps[..self.revealed]
    }

    pub fn open(&self) -> &[f64] {
        &self.series.open[..self.revealed]
    }

    pub fn high(&self) -> &[f64] {
        &self.series.high[..self.revealed]
    }

    pub fn low(&self) -> &[f64] {
        &self.series.low[..self.revealed]
    }

    pub fn close(&self) -> &[f64] {
        &self.series.close[..self.revealed]
    }

    pub fn volume(&self) -> &[f64] {
        &self.series.volume[..self.revealed]
    }

    /// The newest visible candle.
    pub fn last_candle(&self) -> Option<Candle> {
        self.revealed.checked_sub(1).and_then(|i| self.series.candle(i))
    }

    /// The newest visible close, the price trading actions sample.
    pub fn last_close(&self) -> Option<f64> {
        self.close().last().copied()
    }

    /// Owned copy of the visible prefix.
    pub fn to_series(&self) -> CandleSeries {
        self.series.prefix(self.revealed)
    }
}
