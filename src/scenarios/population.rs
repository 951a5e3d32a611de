//! Predator-prey difference equations.
//!
//! A discrete Lotka-Volterra variant stepped on a fixed timer rather than the
//! animation frame. Each step:
//!
//! ```text
//! prey'     = prey + birth·prey − predation·prey·predator
//! predator' = predator + 0.1·predation·prey·predator − 0.1·predator
//! ```
//!
//! Both populations are clamped to `[0, 100]` and the pair is appended to a
//! bounded history for charting. Rate changes take effect on the next step
//! without disturbing the populations; only [`Model::reset`] restarts them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Cadence, Model, Simulation};
use crate::engine::{ParamSpec, ParameterSet, SimTime};
use crate::error::SimResult;
use crate::visualization::{chart_polyline, PairedHistory, Point2, Rect};

/// Parameter names.
pub const BIRTH_RATE: &str = "birth_rate";
/// Parameter names.
pub const PREDATION_RATE: &str = "predation_rate";

/// Upper bound for either population.
pub const POPULATION_CAP: f64 = 100.0;

/// Predator conversion efficiency and death rate.
const PREDATOR_COUPLING: f64 = 0.1;

/// Configuration for the predator-prey model.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PopulationConfig {
    /// Prey population after reset.
    #[validate(range(min = 0.0, max = 100.0))]
    pub initial_prey: f64,
    /// Predator population after reset.
    #[validate(range(min = 0.0, max = 100.0))]
    pub initial_predator: f64,
    /// Default prey birth rate.
    #[validate(range(min = 0.1, max = 1.0))]
    pub birth_rate: f64,
    /// Default predation rate.
    #[validate(range(min = 0.05, max = 0.5))]
    pub predation_rate: f64,
    /// Milliseconds between steps.
    #[validate(range(min = 1))]
    pub interval_ms: u64,
    /// Samples kept per history channel.
    #[validate(range(min = 2))]
    pub history_capacity: usize,
    /// Chart canvas width (px).
    #[validate(range(min = 61.0))]
    pub chart_width: f64,
    /// Chart canvas height (px).
    #[validate(range(min = 51.0))]
    pub chart_height: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_prey: 10.0,
            initial_predator: 4.0,
            birth_rate: 0.5,
            predation_rate: 0.2,
            interval_ms: 500,
            // 50 retained plus the newest sample
            history_capacity: 51,
            chart_width: 500.0,
            chart_height: 300.0,
        }
    }
}

impl PopulationConfig {
    fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(
            "population",
            [
                ParamSpec::new(BIRTH_RATE, 0.1, 1.0, 0.01, self.birth_rate),
                ParamSpec::new(PREDATION_RATE, 0.05, 0.5, 0.01, self.predation_rate),
            ],
        )
    }

    /// Plot rectangle inside the chart canvas: axes at `x = 40` and
    /// `y = height − 30`.
    #[must_use]
    pub fn plot_area(&self) -> Rect {
        Rect::new(40.0, 20.0, self.chart_width - 60.0, self.chart_height - 50.0)
    }
}

/// Current populations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationState {
    /// Prey count, in `[0, 100]`.
    pub prey: f64,
    /// Predator count, in `[0, 100]`.
    pub predator: f64,
}

impl PopulationState {
    /// One step of the difference equations, clamped.
    #[must_use]
    pub fn next(self, birth_rate: f64, predation_rate: f64) -> Self {
        let encounters = self.prey * self.predator;
        let prey = self.prey + birth_rate * self.prey - predation_rate * encounters;
        let predator = self.predator + PREDATOR_COUPLING * predation_rate * encounters
            - PREDATOR_COUPLING * self.predator;
        Self {
            prey: prey.clamp(0.0, POPULATION_CAP),
            predator: predator.clamp(0.0, POPULATION_CAP),
        }
    }
}

/// Snapshot for the population chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationFrame {
    /// Current populations.
    pub state: PopulationState,
    /// Prey history, oldest first.
    pub prey_history: Vec<f64>,
    /// Predator history, oldest first.
    pub predator_history: Vec<f64>,
    /// Steps taken since the last reset.
    pub generation: u64,
}

impl PopulationFrame {
    /// Prey and predator polylines for a plot rectangle.
    #[must_use]
    pub fn chart(&self, area: Rect) -> (Vec<Point2>, Vec<Point2>) {
        (
            chart_polyline(self.prey_history.iter(), area, POPULATION_CAP),
            chart_polyline(self.predator_history.iter(), area, POPULATION_CAP),
        )
    }
}

/// Predator-prey model.
#[derive(Debug, Clone)]
pub struct PopulationModel {
    config: PopulationConfig,
    params: ParameterSet,
    state: PopulationState,
    history: PairedHistory,
    generation: u64,
}

impl PopulationModel {
    /// Create a model at its initial populations.
    #[must_use]
    pub fn new(config: PopulationConfig) -> Self {
        let params = config.parameter_set();
        let state = Self::initial_state(&config);
        let mut history = PairedHistory::new(config.history_capacity);
        history.push(state.prey, state.predator);
        Self {
            config,
            params,
            state,
            history,
            generation: 0,
        }
    }

    fn initial_state(config: &PopulationConfig) -> PopulationState {
        PopulationState {
            prey: config.initial_prey.clamp(0.0, POPULATION_CAP),
            predator: config.initial_predator.clamp(0.0, POPULATION_CAP),
        }
    }

    /// Current populations.
    #[must_use]
    pub const fn state(&self) -> &PopulationState {
        &self.state
    }

    /// Recorded populations.
    #[must_use]
    pub const fn history(&self) -> &PairedHistory {
        &self.history
    }

    /// Get configuration.
    #[must_use]
    pub const fn config(&self) -> &PopulationConfig {
        &self.config
    }

    /// Steps since the last reset.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Step interval.
    #[must_use]
    pub const fn interval(&self) -> SimTime {
        SimTime::from_millis(self.config.interval_ms)
    }

    /// Apply one step and record it.
    pub fn step(&mut self) {
        self.state = self.state.next(
            self.params.value(BIRTH_RATE),
            self.params.value(PREDATION_RATE),
        );
        self.history.push(self.state.prey, self.state.predator);
        self.generation += 1;
    }
}

impl Default for PopulationModel {
    fn default() -> Self {
        Self::new(PopulationConfig::default())
    }
}

impl Model for PopulationModel {
    type Frame = PopulationFrame;

    fn name(&self) -> &'static str {
        "population"
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> SimResult<f64> {
        self.params.set(name, value)
    }

    fn reset(&mut self) {
        self.state = Self::initial_state(&self.config);
        self.history.restart(self.state.prey, self.state.predator);
        self.generation = 0;
    }

    fn frame(&self) -> PopulationFrame {
        PopulationFrame {
            state: self.state,
            prey_history: self.history.first().to_vec(),
            predator_history: self.history.second().to_vec(),
            generation: self.generation,
        }
    }
}

impl Simulation for PopulationModel {
    fn cadence(&self) -> Cadence {
        Cadence::FixedInterval(self.interval())
    }

    /// One step per timer firing; elapsed time is not used.
    fn advance(&mut self, _dt: f64) {
        self.step();
    }

    fn is_finite(&self) -> bool {
        self.state.prey.is_finite() && self.state.predator.is_finite()
    }
}
