//! Simulation clock management.
//!
//! The clock turns host frame timestamps into per-step time deltas. It is a
//! pure accumulator: it never sleeps and never schedules anything. While the
//! clock is paused every delta is exactly zero, so a stray frame delivered
//! during a pause degrades to a no-op step instead of a drift.

use serde::{Deserialize, Serialize};

use crate::engine::SimTime;

/// Run/pause lifecycle and frame-delta accumulator for one model instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Whether deltas are currently produced.
    running: bool,
    /// Timestamp of the previous tick.
    last_tick: Option<SimTime>,
    /// Number of ticks observed.
    tick_count: u64,
    /// Total time accumulated while running.
    elapsed: SimTime,
}

impl SimulationClock {
    /// Create a clock in the given run state.
    #[must_use]
    pub const fn new(running: bool) -> Self {
        Self {
            running,
            last_tick: None,
            tick_count: 0,
            elapsed: SimTime::ZERO,
        }
    }

    /// Whether the clock is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Timestamp of the previous tick, if any.
    #[must_use]
    pub const fn last_tick(&self) -> Option<SimTime> {
        self.last_tick
    }

    /// Number of ticks observed (running or not).
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Total time that elapsed while running.
    #[must_use]
    pub const fn elapsed(&self) -> SimTime {
        self.elapsed
    }

    /// Start (or resume) the clock.
    ///
    /// The previous timestamp is forgotten, so the first tick after a resume
    /// yields a zero delta rather than one spanning the whole pause.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn start(&mut self) {
        self.running = true;
        self.last_tick = None;
    }

    /// Pause the clock without touching model state.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Flip between running and paused. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
        self.running
    }

    /// Observe a host timestamp and return the step delta in seconds.
    ///
    /// Returns `0.0` while paused, on the first tick, and for timestamps that
    /// are not after the previous one.
    pub fn tick(&mut self, timestamp: SimTime) -> f64 {
        let delta = match (self.running, self.last_tick) {
            (true, Some(last)) => timestamp - last,
            _ => SimTime::ZERO,
        };
        self.last_tick = Some(timestamp);
        self.tick_count += 1;
        self.elapsed = self.elapsed + delta;
        delta.as_secs_f64()
    }

    /// Forget all history, keeping the run state.
    #[allow(clippy::missing_const_for_fn)] // Mutable const not stable
    pub fn reset(&mut self) {
        self.last_tick = None;
        self.tick_count = 0;
        self.elapsed = SimTime::ZERO;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(true)
    }
}
