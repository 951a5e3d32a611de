//! Interactive classroom models.
//!
//! - [`pendulum`]: simple pendulum, semi-implicit Euler
//! - [`population`]: predator-prey difference equations with clamping
//! - [`chemistry`]: reacting two-species particle gas in a box
//! - [`quadratic`]: closed-form quadratic with derivative and tangent line
//!
//! Every model implements [`Model`] (parameters, reset, snapshot). The three
//! time-driven ones also implement [`Simulation`] so a
//! [`ModelRunner`](crate::engine::ModelRunner) can drive them.

pub mod chemistry;
pub mod pendulum;
pub mod population;
pub mod quadratic;

use serde::Serialize;

use crate::engine::{ParameterSet, SimTime};
use crate::error::SimResult;

pub use chemistry::{ChemistryConfig, ChemistryModel, Particle, Species};
pub use pendulum::{PendulumConfig, PendulumModel, PendulumState};
pub use population::{PopulationConfig, PopulationModel, PopulationState};
pub use quadratic::{QuadraticConfig, QuadraticModel, QuadraticParams};

/// Control surface shared by all models.
pub trait Model {
    /// Snapshot handed to renderers.
    type Frame: Clone + Serialize;

    /// Stable model name.
    fn name(&self) -> &'static str;

    /// Current tunables.
    fn parameters(&self) -> &ParameterSet;

    /// Set a tunable, clamping into range. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Fails for undeclared names or non-finite values.
    fn set_parameter(&mut self, name: &str, value: f64) -> SimResult<f64>;

    /// Restore the model's initial state for the current parameters.
    fn reset(&mut self);

    /// Snapshot of the current state for rendering.
    fn frame(&self) -> Self::Frame;
}

/// How a simulation wants to be stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Once per host animation frame, with the frame delta.
    AnimationFrame,
    /// On a fixed wall-clock interval, one step per firing.
    FixedInterval(SimTime),
}

/// A model that advances in time.
pub trait Simulation: Model {
    /// Stepping cadence.
    fn cadence(&self) -> Cadence;

    /// Advance by one step covering `dt` seconds.
    fn advance(&mut self, dt: f64);

    /// Whether every state variable is finite.
    fn is_finite(&self) -> bool {
        true
    }

    /// Empty the model ahead of a deferred restart.
    fn clear(&mut self) {
        self.reset();
    }
}
