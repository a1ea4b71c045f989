use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Playback tuning: how much of the series is revealed up front and
/// how fast the tape advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Candles revealed immediately on load/reset.
    pub initial_window: usize,
    pub initial_period_ms: u64,
    pub min_period_ms: u64,
    pub max_period_ms: u64,
}

impl PlaybackConfig {
    /// Pattern replay mode: 50-candle head start, adjustable cadence.
    pub fn pattern_replay() -> Self {
        Self {
            initial_window: 50,
            initial_period_ms: 1_000,
            min_period_ms: 125,
            max_period_ms: 2_000,
        }
    }

    /// Practice mode: 18-candle head start at a fixed one-second tick.
    ///
    /// Speed commands still clamp, so they are no-ops here.
    pub fn practice() -> Self {
        Self {
            initial_window: 18,
            initial_period_ms: 1_000,
            min_period_ms: 1_000,
            max_period_ms: 1_000,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::pattern_replay()
    }
}

/// Tick cadence. Speed commands halve or double the period, clamped to
/// the configured bounds, so the period stays on a power-of-two ladder
/// anchored at the initial period.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    period_ms: u64,
    min_ms: u64,
    max_ms: u64,
}

impl PlaybackClock {
    pub fn new(config: &PlaybackConfig) -> Self {
        let min_ms = config.min_period_ms.max(1);
        let max_ms = config.max_period_ms.max(min_ms);
        Self {
            period_ms: config.initial_period_ms.clamp(min_ms, max_ms),
            min_ms,
            max_ms,
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Halve (faster) or double (slower) the period, clamped.
    pub fn adjust(&mut self, faster: bool) -> Duration {
        let next = if faster {
            self.period_ms / 2
        } else {
            self.period_ms.saturating_mul(2)
        };
        self.period_ms = next.clamp(self.min_ms, self.max_ms);
        self.period()
    }
}
