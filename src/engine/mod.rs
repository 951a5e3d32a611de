//! Core simulation machinery shared by every model.
//!
//! - [`clock`]: frame-delta accumulator with run/pause lifecycle
//! - [`scheduler`]: cancelable frame and timer tasks
//! - [`runner`]: lifecycle owner tying a model to a clock, scheduler and renderer
//! - [`params`]: bounded, clamped tunables
//! - [`rng`]: deterministic PCG random source

pub mod clock;
pub mod params;
pub mod rng;
pub mod runner;
pub mod scheduler;

use serde::{Deserialize, Serialize};

pub use clock::SimulationClock;
pub use params::{ParamSpec, ParameterSet};
pub use rng::SimRng;
pub use runner::{ModelRunner, RunnerPhase};
pub use scheduler::{FrameScheduler, ManualScheduler, ScheduledTask, TaskKind, TaskToken};

/// Host timestamp or duration in whole nanoseconds.
///
/// Scheduler deadlines compare exactly, so frame boundaries and timers are
/// ordered the same way on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct SimTime {
    nanos: u64,
}

impl SimTime {
    /// Host start.
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create from seconds, rounded to the nearest nanosecond.
    ///
    /// Negative or non-finite input maps to zero.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = (secs * 1_000_000_000.0).round() as u64;
        Self { nanos }
    }

    /// Create from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    /// Create from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Seconds as `f64`, the unit models step in.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Whole nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }
}

impl std::ops::Add for SimTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos.saturating_add(rhs.nanos),
        }
    }
}

impl std::ops::Sub for SimTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}ms", self.nanos as f64 / 1_000_000.0)
    }
}
