use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One time-bucketed OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A chronological candle series stored as parallel arrays.
///
/// Immutable once handed to a `SeriesStore`; consumers that need a
/// partial view take an owned `prefix` snapshot instead of aliasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl CandleSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            timestamps: Vec::with_capacity(n),
            open: Vec::with_capacity(n),
            high: Vec::with_capacity(n),
            low: Vec::with_capacity(n),
            close: Vec::with_capacity(n),
            volume: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn push(&mut self, candle: Candle) {
        self.timestamps.push(candle.timestamp);
        self.open.push(candle.open);
        self.high.push(candle.high);
        self.low.push(candle.low);
        self.close.push(candle.close);
        self.volume.push(candle.volume);
    }

    pub fn candle(&self, index: usize) -> Option<Candle> {
        if index >= self.len() {
            return None;
        }
        Some(Candle {
            timestamp: self.timestamps[index],
            open: self.open[index],
            high: self.high[index],
            low: self.low[index],
            close: self.close[index],
            volume: self.volume[index],
        })
    }

    /// Owned snapshot of the first `k` candles, clamped to the series length.
    pub fn prefix(&self, k: usize) -> Self {
        let k = k.min(self.len());
        Self {
            timestamps: self.timestamps[..k].to_vec(),
            open: self.open[..k].to_vec(),
            high: self.high[..k].to_vec(),
            low: self.low[..k].to_vec(),
            close: self.close[..k].to_vec(),
            volume: self.volume[..k].to_vec(),
        }
    }
}

impl FromIterator<Candle> for CandleSeries {
    fn from_iter<I: IntoIterator<Item = Candle>>(iter: I) -> Self {
        let mut series = Self::default();
        for candle in iter {
            series.push(candle);
        }
        series
    }
}

/// Chart pattern classification.
///
/// Doubles as the P&L attribution category: realized profit is booked
/// against whichever pattern the user was trading at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    DoubleBottom,
    HighVolatility,
    Hammer,
    Green,
    GreenFive,
    Random,
}

impl PatternKind {
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::DoubleBottom => "double_bottom",
            PatternKind::HighVolatility => "high_volatility",
            PatternKind::Hammer => "hammer",
            PatternKind::Green => "green",
            PatternKind::GreenFive => "green_five",
            PatternKind::Random => "random",
        }
    }

    pub fn all() -> &'static [PatternKind] {
        &[
            PatternKind::DoubleBottom,
            PatternKind::HighVolatility,
            PatternKind::Hammer,
            PatternKind::Green,
            PatternKind::GreenFive,
            PatternKind::Random,
        ]
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Coerce NaN/infinite intermediates to 0 before they reach stored state.
///
/// Simulation state must never poison itself: an empty-ledger division
/// or a malformed upstream price becomes a harmless zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
