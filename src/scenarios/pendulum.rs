//! Simple pendulum.
//!
//! A bob on a massless rod, no damping and no driving force. Each frame:
//!
//! ```text
//! α = -(g / L) · sin θ
//! ω ← ω + α · Δt
//! θ ← θ + ω · Δt
//! ```
//!
//! Acceleration is taken from the current angle before velocity moves, and
//! velocity moves before the angle (semi-implicit Euler). Length is in canvas
//! pixels, so `g / L` is small and the swing is slow enough to follow by eye.
//!
//! Touching any control resets the swing to rest at the initial angle.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Cadence, Model, Simulation};
use crate::engine::{ParamSpec, ParameterSet};
use crate::error::SimResult;
use crate::visualization::Point2;

/// Parameter names.
pub const LENGTH: &str = "length";
/// Parameter names.
pub const INITIAL_ANGLE: &str = "initial_angle";
/// Parameter names.
pub const GRAVITY: &str = "gravity";

/// Configuration for the pendulum model.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PendulumConfig {
    /// Default rod length (px).
    #[validate(range(min = 50.0, max = 200.0))]
    pub length: f64,
    /// Default release angle (radians, 0 = hanging down).
    #[validate(range(min = 0.0, max = 1.570_796_326_794_896_6))]
    pub initial_angle: f64,
    /// Default gravitational acceleration.
    #[validate(range(min = 1.0, max = 20.0))]
    pub gravity: f64,
    /// Canvas width (px); the pivot sits at its horizontal center.
    #[validate(range(min = 1.0))]
    pub canvas_width: f64,
    /// Canvas height (px).
    #[validate(range(min = 1.0))]
    pub canvas_height: f64,
    /// Pivot distance from the top edge (px).
    #[validate(range(min = 0.0))]
    pub pivot_y: f64,
    /// Pivot marker radius (px).
    pub pivot_radius: f64,
    /// Bob radius (px).
    pub bob_radius: f64,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            length: 150.0,
            initial_angle: std::f64::consts::FRAC_PI_4, // 45 degrees
            gravity: 9.8,
            canvas_width: 400.0,
            canvas_height: 300.0,
            pivot_y: 50.0,
            pivot_radius: 5.0,
            bob_radius: 15.0,
        }
    }
}

impl PendulumConfig {
    /// Create a small-angle pendulum (linearized regime).
    #[must_use]
    pub fn small_angle() -> Self {
        Self {
            initial_angle: 0.1, // ~6 degrees
            ..Default::default()
        }
    }

    /// Create a large-angle pendulum (nonlinear regime).
    #[must_use]
    pub fn large_angle() -> Self {
        Self {
            initial_angle: std::f64::consts::FRAC_PI_2, // 90 degrees
            ..Default::default()
        }
    }

    fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(
            "pendulum",
            [
                ParamSpec::new(LENGTH, 50.0, 200.0, 1.0, self.length),
                ParamSpec::new(
                    INITIAL_ANGLE,
                    0.0,
                    std::f64::consts::FRAC_PI_2,
                    0.01,
                    self.initial_angle,
                ),
                ParamSpec::new(GRAVITY, 1.0, 20.0, 0.1, self.gravity),
            ],
        )
    }
}

/// Angular state of the bob.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PendulumState {
    /// Angle from vertical (rad).
    pub angle: f64,
    /// Angular velocity (rad/s).
    pub angular_velocity: f64,
    /// Angular acceleration from the last step (rad/s²).
    pub angular_acceleration: f64,
}

impl PendulumState {
    /// At rest at `angle`.
    #[must_use]
    pub const fn at_rest(angle: f64) -> Self {
        Self {
            angle,
            angular_velocity: 0.0,
            angular_acceleration: 0.0,
        }
    }
}

/// Everything a canvas renderer needs for one pendulum frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendulumFrame {
    /// Angular state.
    pub state: PendulumState,
    /// Pivot point (canvas px).
    pub pivot: Point2,
    /// Bob center (canvas px).
    pub bob: Point2,
    /// Pivot marker radius.
    pub pivot_radius: f64,
    /// Bob radius.
    pub bob_radius: f64,
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
}

/// Simple pendulum model.
#[derive(Debug, Clone)]
pub struct PendulumModel {
    config: PendulumConfig,
    params: ParameterSet,
    state: PendulumState,
}

impl PendulumModel {
    /// Create a pendulum at rest at the configured initial angle.
    #[must_use]
    pub fn new(config: PendulumConfig) -> Self {
        let params = config.parameter_set();
        let state = PendulumState::at_rest(params.value(INITIAL_ANGLE));
        Self {
            config,
            params,
            state,
        }
    }

    /// Current angular state.
    #[must_use]
    pub const fn state(&self) -> &PendulumState {
        &self.state
    }

    /// Get configuration.
    #[must_use]
    pub const fn config(&self) -> &PendulumConfig {
        &self.config
    }

    /// Rod length (px).
    #[must_use]
    pub fn length(&self) -> f64 {
        self.params.value(LENGTH)
    }

    /// Gravitational acceleration.
    #[must_use]
    pub fn gravity(&self) -> f64 {
        self.params.value(GRAVITY)
    }

    /// Release angle.
    #[must_use]
    pub fn initial_angle(&self) -> f64 {
        self.params.value(INITIAL_ANGLE)
    }

    /// Pivot point on the canvas.
    #[must_use]
    pub fn pivot(&self) -> Point2 {
        Point2::new(self.config.canvas_width / 2.0, self.config.pivot_y)
    }

    /// Bob center, derived from the angle.
    #[must_use]
    pub fn bob_position(&self) -> Point2 {
        let origin = self.pivot();
        let length = self.length();
        Point2::new(
            origin.x + length * self.state.angle.sin(),
            origin.y + length * self.state.angle.cos(),
        )
    }

    /// Small-oscillation period `2π·sqrt(L/g)`.
    #[must_use]
    pub fn small_angle_period(&self) -> f64 {
        2.0 * std::f64::consts::PI * (self.length() / self.gravity()).sqrt()
    }

    /// Mechanical energy per unit mass: `½(Lω)² + gL(1 − cos θ)`.
    #[must_use]
    pub fn specific_energy(&self) -> f64 {
        let length = self.length();
        let speed = length * self.state.angular_velocity;
        0.5 * speed * speed + self.gravity() * length * (1.0 - self.state.angle.cos())
    }

    /// Advance one semi-implicit Euler step.
    pub fn step(&mut self, dt: f64) {
        let alpha = -(self.gravity() / self.length()) * self.state.angle.sin();
        self.state.angular_acceleration = alpha;
        self.state.angular_velocity += alpha * dt;
        self.state.angle += self.state.angular_velocity * dt;
    }
}

impl Default for PendulumModel {
    fn default() -> Self {
        Self::new(PendulumConfig::default())
    }
}

impl Model for PendulumModel {
    type Frame = PendulumFrame;

    fn name(&self) -> &'static str {
        "pendulum"
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> SimResult<f64> {
        let stored = self.params.set(name, value)?;
        // Every pendulum control restarts the swing.
        self.reset();
        Ok(stored)
    }

    fn reset(&mut self) {
        self.state = PendulumState::at_rest(self.initial_angle());
    }

    fn frame(&self) -> PendulumFrame {
        PendulumFrame {
            state: self.state,
            pivot: self.pivot(),
            bob: self.bob_position(),
            pivot_radius: self.config.pivot_radius,
            bob_radius: self.config.bob_radius,
            width: self.config.canvas_width,
            height: self.config.canvas_height,
        }
    }
}

impl Simulation for PendulumModel {
    fn cadence(&self) -> Cadence {
        Cadence::AnimationFrame
    }

    fn advance(&mut self, dt: f64) {
        self.step(dt);
    }

    fn is_finite(&self) -> bool {
        self.state.angle.is_finite()
            && self.state.angular_velocity.is_finite()
            && self.state.angular_acceleration.is_finite()
    }
}
