use std::sync::{Arc, Mutex};
use std::time::Duration;

use replay_core::CandleSeries;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::{PlaybackClock, PlaybackConfig};
use crate::window::VisibleWindow;

/// Engine state: `Idle` holds the cursor fixed, `Running` advances it
/// on a repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
}

/// Outcome of applying one scheduled tick.
struct TickOutcome {
    /// Snapshot to publish, if the tick changed anything.
    window: Option<VisibleWindow>,
    /// False once the ticker task should exit.
    keep_running: bool,
}

struct EngineCore {
    series: Arc<CandleSeries>,
    revealed: usize,
    clock: PlaybackClock,
    state: PlaybackState,
    /// Bumped on every command that invalidates scheduled ticks
    /// (stop, reset, speed change, series replacement). A tick whose
    /// token no longer matches is stale and must not touch state.
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl EngineCore {
    fn window(&self) -> VisibleWindow {
        VisibleWindow::new(Arc::clone(&self.series), self.revealed)
    }

    /// Cancel any scheduled ticker and invalidate its token.
    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn apply_tick(&mut self, token: u64) -> TickOutcome {
        if token != self.generation || self.state != PlaybackState::Running {
            // Stale tick: its schedule was cancelled after it was queued.
            return TickOutcome {
                window: None,
                keep_running: false,
            };
        }

        if self.revealed >= self.series.len() {
            self.state = PlaybackState::Idle;
            return TickOutcome {
                window: None,
                keep_running: false,
            };
        }

        self.revealed += 1;
        let pinned = self.revealed == self.series.len();
        if pinned {
            // End of data: pin the cursor and fall back to Idle.
            self.state = PlaybackState::Idle;
            tracing::debug!(revealed = self.revealed, "playback reached end of series");
        }
        TickOutcome {
            window: Some(self.window()),
            keep_running: !pinned,
        }
    }
}

/// Candle-by-candle replay over a fixed series.
///
/// Owns the reveal cursor exclusively; collaborators drive it only
/// through the command methods and observe it through [`VisibleWindow`]
/// snapshots. One tick reveals exactly one candle, so the speed setting
/// changes cadence but never which data is visible at a given cursor.
pub struct PlaybackEngine {
    config: PlaybackConfig,
    core: Arc<Mutex<EngineCore>>,
    window_tx: watch::Sender<VisibleWindow>,
}

impl PlaybackEngine {
    pub fn new(config: PlaybackConfig) -> Self {
        let (window_tx, _) = watch::channel(VisibleWindow::empty());
        let core = EngineCore {
            series: Arc::new(CandleSeries::default()),
            revealed: 0,
            clock: PlaybackClock::new(&config),
            state: PlaybackState::Idle,
            generation: 0,
            ticker: None,
        };
        Self {
            config,
            core: Arc::new(Mutex::new(core)),
            window_tx,
        }
    }

    /// Subscribe to visible-window snapshots.
    pub fn subscribe(&self) -> watch::Receiver<VisibleWindow> {
        self.window_tx.subscribe()
    }

    /// The latest published snapshot.
    pub fn visible_window(&self) -> VisibleWindow {
        self.window_tx.borrow().clone()
    }

    pub fn state(&self) -> PlaybackState {
        self.lock().state
    }

    pub fn revealed(&self) -> usize {
        self.lock().revealed
    }

    pub fn period_ms(&self) -> u64 {
        self.lock().clock.period_ms()
    }

    /// Replace the series being replayed.
    ///
    /// Implicitly stops playback and re-reveals the configured initial
    /// window against the new data; ticks scheduled against the old
    /// series are invalidated before the swap.
    pub fn load_series(&self, series: CandleSeries) {
        let mut core = self.lock();
        core.invalidate();
        core.state = PlaybackState::Idle;
        core.series = Arc::new(series);
        core.revealed = self.config.initial_window.min(core.series.len());
        tracing::debug!(
            len = core.series.len(),
            revealed = core.revealed,
            "series loaded"
        );
        self.publish(&core);
    }

    /// `Idle → Running`; no-op if already running.
    pub fn start(&self) {
        let mut core = self.lock();
        if core.state == PlaybackState::Running {
            return;
        }
        core.state = PlaybackState::Running;
        core.generation += 1;
        let token = core.generation;
        let period = core.clock.period();
        core.ticker = Some(self.spawn_ticker(token, period));
        tracing::debug!(period_ms = core.clock.period_ms(), "playback started");
    }

    /// `Running → Idle`; cursor stays exactly where it stopped.
    pub fn stop(&self) {
        let mut core = self.lock();
        if core.state == PlaybackState::Idle {
            return;
        }
        core.invalidate();
        core.state = PlaybackState::Idle;
        tracing::debug!(revealed = core.revealed, "playback stopped");
    }

    /// Any state `→ Idle` with the cursor back at the initial window.
    pub fn reset(&self) {
        let mut core = self.lock();
        core.invalidate();
        core.state = PlaybackState::Idle;
        core.revealed = self.config.initial_window.min(core.series.len());
        self.publish(&core);
    }

    /// Halve (faster) or double (slower) the tick period, clamped.
    ///
    /// If running, the timer restarts at the new period without moving
    /// the cursor. Returns the effective period.
    pub fn set_speed(&self, faster: bool) -> Duration {
        let mut core = self.lock();
        let period = core.clock.adjust(faster);
        if core.state == PlaybackState::Running {
            core.invalidate();
            let token = core.generation;
            core.ticker = Some(self.spawn_ticker(token, period));
        }
        tracing::debug!(period_ms = core.clock.period_ms(), "playback speed set");
        period
    }

    fn spawn_ticker(&self, token: u64, period: Duration) -> JoinHandle<()> {
        let core = Arc::clone(&self.core);
        let window_tx = self.window_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; the first
            // reveal should land one full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                let outcome = {
                    let mut core = core.lock().unwrap_or_else(|e| e.into_inner());
                    core.apply_tick(token)
                };
                if let Some(window) = outcome.window {
                    window_tx.send_replace(window);
                }
                if !outcome.keep_running {
                    return;
                }
            }
        })
    }

    fn publish(&self, core: &EngineCore) {
        self.window_tx.send_replace(core.window());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineCore> {
        self.core.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.lock().invalidate();
    }
}
