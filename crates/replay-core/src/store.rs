use std::sync::{Arc, RwLock};

use crate::types::CandleSeries;

/// Holds the full fetched candle series.
///
/// The series is replaced wholesale on every load and never edited in
/// place, so readers always observe either the previous complete
/// series or the new one. Each load bumps a generation stamp that
/// downstream timers use to detect that their series went stale.
#[derive(Debug, Default)]
pub struct SeriesStore {
    inner: RwLock<(Arc<CandleSeries>, u64)>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored series atomically. Returns the new generation.
    pub fn load(&self, series: CandleSeries) -> u64 {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        guard.0 = Arc::new(series);
        guard.1 += 1;
        guard.1
    }

    /// The current complete series plus its generation stamp.
    pub fn snapshot(&self) -> (Arc<CandleSeries>, u64) {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        (Arc::clone(&guard.0), guard.1)
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).1
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .0
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
