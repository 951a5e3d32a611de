//! # edusim
//!
//! Interactive classroom simulations with a UI-free core.
//!
//! Four models share one control surface:
//! - Physics: a simple pendulum stepped with semi-implicit Euler
//! - Biology: predator-prey difference equations on a fixed timer
//! - Chemistry: two reactant species colliding into an inert product
//! - Mathematics: a quadratic with its derivative and tangent line
//!
//! Models never paint or schedule themselves. A [`engine::ModelRunner`]
//! owns the lifecycle and steps a model from an injected
//! [`engine::FrameScheduler`], handing each frame to an injected
//! [`visualization::Renderer`].
//!
//! ## Example
//!
//! ```rust
//! use edusim::prelude::*;
//!
//! let mut runner = ModelRunner::new(
//!     PendulumModel::default(),
//!     ManualScheduler::default(),
//!     RecordingRenderer::new(16),
//! );
//! runner.mount().ok();
//! runner.run_until(SimTime::from_secs(1.0)).ok();
//! assert!(runner.model().state().angle < std::f64::consts::FRAC_PI_4);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Plain arithmetic mirrors the textbook formulas
    clippy::imprecise_flops,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::float_cmp,             // Exact comparisons are asserted in reset tests
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod scenarios;
pub mod visualization;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{LabConfig, LabConfigBuilder};
    pub use crate::engine::rng::SimRng;
    pub use crate::engine::{
        FrameScheduler, ManualScheduler, ModelRunner, ParamSpec, ParameterSet, RunnerPhase,
        SimTime, SimulationClock, TaskToken,
    };
    pub use crate::error::{SimError, SimResult};
    pub use crate::scenarios::{
        Cadence, ChemistryModel, Model, PendulumModel, PopulationModel, QuadraticModel,
        Simulation,
    };
    pub use crate::visualization::{NullRenderer, RecordingRenderer, Renderer};
}

/// Re-export for public API
pub use error::{SimError, SimResult};
