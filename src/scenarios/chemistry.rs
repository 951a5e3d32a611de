//! Reacting particle gas in a box.
//!
//! Two reactant species drift with a temperature-scaled speed and bounce off
//! the walls. When an A and a B particle overlap they are replaced by a single
//! inert product at their midpoint. Concentration sets the initial particle
//! count and temperature sets both the initial velocity spread and the
//! per-frame speed factor.
//!
//! A frame is motion for every particle, then one reaction pass. The reaction
//! pass plans against an unchanging snapshot and applies afterwards, so no
//! particle takes part in two reactions in the same frame.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Cadence, Model, Simulation};
use crate::engine::{ParamSpec, ParameterSet, SimRng, SimTime};
use crate::error::SimResult;
use crate::visualization::Point2;

/// Parameter names.
pub const TEMPERATURE: &str = "temperature";
/// Parameter names.
pub const CONCENTRATION: &str = "concentration";

/// Particles per species per unit of concentration.
const PARTICLES_PER_UNIT: f64 = 50.0;

/// Particle species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    /// First reactant.
    ReactantA,
    /// Second reactant.
    ReactantB,
    /// Reaction product. Inert.
    Product,
}

impl Species {
    /// Whether `self` and `other` are the two distinct reactants.
    #[must_use]
    pub const fn reacts_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::ReactantA, Self::ReactantB) | (Self::ReactantB, Self::ReactantA)
        )
    }
}

/// A single particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Center (canvas px).
    pub position: Point2,
    /// Velocity (px per frame before the speed factor).
    pub velocity: Point2,
    /// Radius (px).
    pub radius: f64,
    /// Species.
    pub species: Species,
}

impl Particle {
    /// Create a particle.
    #[must_use]
    pub const fn new(position: Point2, velocity: Point2, radius: f64, species: Species) -> Self {
        Self {
            position,
            velocity,
            radius,
            species,
        }
    }

    /// Whether the particle's disk lies fully inside a `width × height` box.
    #[must_use]
    pub fn is_inside(&self, width: f64, height: f64) -> bool {
        self.position.x >= self.radius
            && self.position.x <= width - self.radius
            && self.position.y >= self.radius
            && self.position.y <= height - self.radius
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.position.distance(&other.position) < self.radius + other.radius
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Configuration for the chemistry model.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChemistryConfig {
    /// Default temperature.
    #[validate(range(min = 0.0, max = 100.0))]
    pub temperature: f64,
    /// Default concentration.
    #[validate(range(min = 0.1, max = 2.0))]
    pub concentration: f64,
    /// Box width (px).
    #[validate(range(min = 1.0))]
    pub width: f64,
    /// Box height (px).
    #[validate(range(min = 1.0))]
    pub height: f64,
    /// Radius of every particle (px).
    #[validate(range(min = 0.5))]
    pub particle_radius: f64,
    /// Seed for initial positions and velocities.
    pub seed: u64,
    /// Delay between clearing and reseeding on a runner reset (ms).
    /// `None` resets in place.
    pub restart_delay_ms: Option<u64>,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            concentration: 1.0,
            width: 400.0,
            height: 300.0,
            particle_radius: 5.0,
            seed: 42,
            restart_delay_ms: Some(100),
        }
    }
}

impl ChemistryConfig {
    /// Restart delay for a runner driving this model.
    #[must_use]
    pub fn restart_delay(&self) -> Option<SimTime> {
        self.restart_delay_ms.map(SimTime::from_millis)
    }

    fn parameter_set(&self) -> ParameterSet {
        ParameterSet::new(
            "chemistry",
            [
                ParamSpec::new(TEMPERATURE, 0.0, 100.0, 1.0, self.temperature),
                ParamSpec::new(CONCENTRATION, 0.1, 2.0, 0.1, self.concentration),
            ],
        )
    }
}

/// Per-species counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeciesCounts {
    /// Live A particles.
    pub reactant_a: usize,
    /// Live B particles.
    pub reactant_b: usize,
    /// Live products.
    pub product: usize,
}

/// Outcome of the most recent frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionReport {
    /// Reactions in the frame.
    pub reactions: usize,
    /// Reactant particles removed in the frame.
    pub reactants_removed: usize,
    /// Counts after the frame.
    pub counts: SpeciesCounts,
}

/// Snapshot for the particle canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryFrame {
    /// Live particles.
    pub particles: Vec<Particle>,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Last frame's reaction summary.
    pub report: ReactionReport,
    /// Products formed since the last initialization.
    pub product_count: u64,
}

/// Reaction pairs for a snapshot, lowest `i` first, then lowest `j`.
///
/// A particle appears in at most one pair.
#[must_use]
pub fn plan_reactions(particles: &[Particle]) -> Vec<(usize, usize)> {
    let mut reacted = vec![false; particles.len()];
    let mut plan = Vec::new();
    for (i, p) in particles.iter().enumerate() {
        if reacted[i] || p.species == Species::Product {
            continue;
        }
        for (j, q) in particles.iter().enumerate().skip(i + 1) {
            if !reacted[j] && p.species.reacts_with(q.species) && p.overlaps(q) {
                reacted[i] = true;
                reacted[j] = true;
                plan.push((i, j));
                break;
            }
        }
    }
    plan
}

/// Chemistry model.
#[derive(Debug, Clone)]
pub struct ChemistryModel {
    config: ChemistryConfig,
    params: ParameterSet,
    rng: SimRng,
    particles: Vec<Particle>,
    report: ReactionReport,
    product_count: u64,
}

impl ChemistryModel {
    /// Create a model and seed its particles.
    #[must_use]
    pub fn new(config: ChemistryConfig) -> Self {
        let params = config.parameter_set();
        let rng = SimRng::new(config.seed);
        let mut model = Self {
            config,
            params,
            rng,
            particles: Vec::new(),
            report: ReactionReport::default(),
            product_count: 0,
        };
        model.initialize();
        model
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Replace the particle set with a prepared arrangement.
    ///
    /// Counters are zeroed. The next [`Model::reset`] reseeds as usual.
    pub fn load_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
        self.product_count = 0;
        self.report = ReactionReport {
            counts: self.counts(),
            ..ReactionReport::default()
        };
    }

    /// Get configuration.
    #[must_use]
    pub const fn config(&self) -> &ChemistryConfig {
        &self.config
    }

    /// Last frame's summary.
    #[must_use]
    pub const fn report(&self) -> &ReactionReport {
        &self.report
    }

    /// Products formed since the last initialization.
    #[must_use]
    pub const fn product_count(&self) -> u64 {
        self.product_count
    }

    /// Current temperature.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.params.value(TEMPERATURE)
    }

    /// Current concentration.
    #[must_use]
    pub fn concentration(&self) -> f64 {
        self.params.value(CONCENTRATION)
    }

    /// Initial particles per reactant for the current concentration.
    #[must_use]
    pub fn particles_per_species(&self) -> usize {
        // Small epsilon keeps 0.3 × 50 at 15 rather than 14.
        let n = (self.concentration() * PARTICLES_PER_UNIT + 1e-9).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            n.max(0.0) as usize
        }
    }

    /// Per-frame displacement multiplier.
    #[must_use]
    pub fn speed_factor(&self) -> f64 {
        0.5 + self.temperature() / 25.0
    }

    /// Count live particles per species.
    #[must_use]
    pub fn counts(&self) -> SpeciesCounts {
        let mut counts = SpeciesCounts::default();
        for p in &self.particles {
            match p.species {
                Species::ReactantA => counts.reactant_a += 1,
                Species::ReactantB => counts.reactant_b += 1,
                Species::Product => counts.product += 1,
            }
        }
        counts
    }

    /// Reseed and scatter fresh reactants for the current parameters.
    fn initialize(&mut self) {
        self.rng.reseed();
        let count = self.particles_per_species();
        let r = self.config.particle_radius;
        let (w, h) = (self.config.width, self.config.height);
        let spread = self.temperature() / 10.0;

        self.particles.clear();
        self.particles.reserve(count * 2);
        for species in [Species::ReactantA, Species::ReactantB] {
            for _ in 0..count {
                let position = Point2::new(
                    self.rng.gen_range_f64(r, (w - r).max(r)),
                    self.rng.gen_range_f64(r, (h - r).max(r)),
                );
                let velocity = Point2::new(
                    self.rng.gen_symmetric(spread),
                    self.rng.gen_symmetric(spread),
                );
                self.particles.push(Particle::new(position, velocity, r, species));
            }
        }
        self.product_count = 0;
        self.report = ReactionReport {
            counts: self.counts(),
            ..ReactionReport::default()
        };
        tracing::debug!(
            per_species = count,
            temperature = self.temperature(),
            "chemistry initialized"
        );
    }

    /// Move every particle one frame and reflect off the walls.
    fn move_particles(&mut self) {
        let factor = self.speed_factor();
        let (w, h) = (self.config.width, self.config.height);
        for p in &mut self.particles {
            p.position.x += p.velocity.x * factor;
            p.position.y += p.velocity.y * factor;

            if p.position.x - p.radius < 0.0 || p.position.x + p.radius > w {
                p.velocity.x = -p.velocity.x;
                p.position.x = p.position.x.max(p.radius).min(w - p.radius);
            }
            if p.position.y - p.radius < 0.0 || p.position.y + p.radius > h {
                p.velocity.y = -p.velocity.y;
                p.position.y = p.position.y.max(p.radius).min(h - p.radius);
            }
        }
    }

    /// Run one reaction pass. Returns the reaction count and the number of
    /// particles removed.
    fn react(&mut self) -> (usize, usize) {
        let plan = plan_reactions(&self.particles);
        if plan.is_empty() {
            return (0, 0);
        }

        let mut consumed = vec![false; self.particles.len()];
        let products: Vec<Particle> = plan
            .iter()
            .map(|&(i, j)| {
                consumed[i] = true;
                consumed[j] = true;
                let (a, b) = (&self.particles[i], &self.particles[j]);
                Particle::new(
                    a.position.midpoint(&b.position),
                    a.velocity.midpoint(&b.velocity),
                    self.config.particle_radius,
                    Species::Product,
                )
            })
            .collect();

        let before = self.particles.len();
        let mut index = 0;
        self.particles.retain(|_| {
            let keep = !consumed[index];
            index += 1;
            keep
        });
        let removed = before - self.particles.len();
        self.particles.extend(products);
        (plan.len(), removed)
    }

    /// Advance one frame: motion, then reactions, then counters.
    pub fn step(&mut self) -> ReactionReport {
        self.move_particles();
        let (reactions, reactants_removed) = self.react();
        self.product_count += reactions as u64;
        self.report = ReactionReport {
            reactions,
            reactants_removed,
            counts: self.counts(),
        };
        if reactions > 0 {
            tracing::trace!(reactions, total = self.product_count, "reactions");
        }
        self.report
    }
}

impl Default for ChemistryModel {
    fn default() -> Self {
        Self::new(ChemistryConfig::default())
    }
}

impl Model for ChemistryModel {
    type Frame = ChemistryFrame;

    fn name(&self) -> &'static str {
        "chemistry"
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn set_parameter(&mut self, name: &str, value: f64) -> SimResult<f64> {
        let stored = self.params.set(name, value)?;
        self.initialize();
        Ok(stored)
    }

    fn reset(&mut self) {
        self.initialize();
    }

    fn frame(&self) -> ChemistryFrame {
        ChemistryFrame {
            particles: self.particles.clone(),
            width: self.config.width,
            height: self.config.height,
            report: self.report,
            product_count: self.product_count,
        }
    }
}

impl Simulation for ChemistryModel {
    fn cadence(&self) -> Cadence {
        Cadence::AnimationFrame
    }

    /// Motion is per frame; `dt` is not used.
    fn advance(&mut self, _dt: f64) {
        self.step();
    }

    fn is_finite(&self) -> bool {
        self.particles.iter().all(Particle::is_finite)
    }

    fn clear(&mut self) {
        self.particles.clear();
        self.product_count = 0;
        self.report = ReactionReport::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn still(x: f64, y: f64, species: Species) -> Particle {
        Particle::new(Point2::new(x, y), Point2::default(), 5.0, species)
    }

    #[test]
    fn test_initial_counts() {
        let model = ChemistryModel::default();
        let counts = model.counts();
        assert_eq!(counts.reactant_a, 50);
        assert_eq!(counts.reactant_b, 50);
        assert_eq!(counts.product, 0);
        assert_eq!(model.product_count(), 0);
    }

    #[test]
    fn test_count_floor() {
        let mut model = ChemistryModel::default();
        model.set_parameter(CONCENTRATION, 0.3).unwrap();
        assert_eq!(model.particles_per_species(), 15);
        assert_eq!(model.counts().reactant_a, 15);
        model.set_parameter(CONCENTRATION, 0.1).unwrap();
        assert_eq!(model.particles().len(), 10);
    }

    #[test]
    fn test_initial_particles_inside_box() {
        let model = ChemistryModel::default();
        for p in model.particles() {
            assert!(p.is_inside(400.0, 300.0), "{p:?}");
        }
    }

    #[test]
    fn test_initial_velocity_spread() {
        let mut model = ChemistryModel::default();
        model.set_parameter(TEMPERATURE, 50.0).unwrap();
        for p in model.particles() {
            assert!(p.velocity.x.abs() <= 5.0);
            assert!(p.velocity.y.abs() <= 5.0);
        }
        model.set_parameter(TEMPERATURE, 0.0).unwrap();
        assert!(model.particles().iter().all(|p| p.velocity == Point2::default()));
    }

    #[test]
    fn test_speed_factor() {
        let mut model = ChemistryModel::default();
        assert!((model.speed_factor() - 1.5).abs() < f64::EPSILON);
        model.set_parameter(TEMPERATURE, 100.0).unwrap();
        assert!((model.speed_factor() - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overlapping_pair_reacts() {
        let mut model = ChemistryModel::default();
        model.load_particles(vec![
            still(100.0, 100.0, Species::ReactantA),
            still(106.0, 100.0, Species::ReactantB),
        ]);
        let report = model.step();
        assert_eq!(report.reactions, 1);
        assert_eq!(report.reactants_removed, 2);
        assert_eq!(model.particles().len(), 1);
        let product = model.particles()[0];
        assert_eq!(product.species, Species::Product);
        assert_eq!(product.position, Point2::new(103.0, 100.0));
        assert_eq!(model.product_count(), 1);
    }

    #[test]
    fn test_touching_pair_does_not_react() {
        let mut model = ChemistryModel::default();
        model.load_particles(vec![
            still(100.0, 100.0, Species::ReactantA),
            still(110.0, 100.0, Species::ReactantB),
        ]);
        assert_eq!(model.step().reactions, 0);
    }

    #[test]
    fn test_same_species_never_react() {
        let mut model = ChemistryModel::default();
        model.load_particles(vec![
            still(100.0, 100.0, Species::ReactantA),
            still(101.0, 100.0, Species::ReactantA),
            still(102.0, 100.0, Species::Product),
        ]);
        assert_eq!(model.step().reactions, 0);
        assert_eq!(model.particles().len(), 3);
    }

    #[test]
    fn test_tie_break_lowest_indices() {
        // B at index 1 overlaps both A particles; the first A wins.
        let particles = vec![
            still(100.0, 100.0, Species::ReactantA),
            still(104.0, 100.0, Species::ReactantB),
            still(108.0, 100.0, Species::ReactantA),
        ];
        assert_eq!(plan_reactions(&particles), vec![(0, 1)]);

        let mut model = ChemistryModel::default();
        model.load_particles(particles);
        model.step();
        let counts = model.counts();
        assert_eq!(counts.reactant_a, 1);
        assert_eq!(counts.product, 1);
        // Survivors keep their order and products go last.
        assert_eq!(model.particles()[0].species, Species::ReactantA);
        assert_eq!(model.particles()[1].species, Species::Product);
    }

    #[test]
    fn test_products_are_inert() {
        let particles = vec![
            still(100.0, 100.0, Species::Product),
            still(101.0, 100.0, Species::ReactantB),
        ];
        assert!(plan_reactions(&particles).is_empty());
    }

    #[test]
    fn test_wall_reflection() {
        let mut model = ChemistryModel::default();
        model.load_particles(vec![Particle::new(
            Point2::new(396.0, 150.0),
            Point2::new(4.0, 0.0),
            5.0,
            Species::ReactantA,
        )]);
        model.step();
        let p = model.particles()[0];
        assert!((p.position.x - 395.0).abs() < f64::EPSILON);
        assert!((p.velocity.x + 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parameter_change_reinitializes() {
        let mut model = ChemistryModel::default();
        for _ in 0..50 {
            model.step();
        }
        model.set_parameter(TEMPERATURE, 25.0).unwrap();
        let fresh = ChemistryModel::default();
        assert_eq!(model.particles(), fresh.particles());
        assert_eq!(model.product_count(), 0);
    }

    #[test]
    fn test_reset_is_bit_identical() {
        let mut model = ChemistryModel::default();
        for _ in 0..30 {
            model.step();
        }
        model.reset();
        let first = model.frame();
        for _ in 0..10 {
            model.step();
        }
        model.reset();
        assert_eq!(model.frame(), first);
    }

    #[test]
    fn test_clear_empties() {
        let mut model = ChemistryModel::default();
        model.clear();
        assert!(model.particles().is_empty());
        assert_eq!(model.product_count(), 0);
        model.reset();
        assert_eq!(model.particles().len(), 100);
    }

    #[test]
    fn test_unknown_parameter() {
        let mut model = ChemistryModel::default();
        assert!(model.set_parameter("pressure", 1.0).is_err());
        assert_eq!(model.particles().len(), 100);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: particles never leave the box.
        #[test]
        fn prop_wall_confinement(
            temperature in 0.0f64..=100.0,
            concentration in 0.1f64..=2.0,
            seed in any::<u64>(),
            frames in 1usize..120,
        ) {
            let mut model = ChemistryModel::new(ChemistryConfig { seed, ..Default::default() });
            model.set_parameter(TEMPERATURE, temperature).ok();
            model.set_parameter(CONCENTRATION, concentration).ok();
            for _ in 0..frames {
                model.step();
                for p in model.particles() {
                    prop_assert!(p.is_inside(400.0, 300.0), "{:?}", p);
                }
            }
        }

        /// Falsification: reaction accounting balances.
        #[test]
        fn prop_reaction_accounting(
            seed in any::<u64>(),
            frames in 1usize..200,
        ) {
            let mut model = ChemistryModel::new(ChemistryConfig {
                seed,
                concentration: 2.0,
                temperature: 80.0,
                ..Default::default()
            });
            let initial = model.particles().len();
            let mut total = 0u64;
            for _ in 0..frames {
                let before = model.counts();
                let report = model.step();
                let reactants_left = report.counts.reactant_a + report.counts.reactant_b;
                prop_assert_eq!(
                    report.reactants_removed,
                    before.reactant_a + before.reactant_b - reactants_left
                );
                prop_assert_eq!(report.reactants_removed, 2 * report.reactions);
                prop_assert_eq!(report.counts.product, before.product + report.reactions);
                total += report.reactions as u64;
            }
            prop_assert_eq!(model.product_count(), total);
            let counts = model.counts();
            prop_assert_eq!(counts.product as u64, total);
            prop_assert_eq!(counts.reactant_a + counts.reactant_b + 2 * counts.product, initial);
        }

        /// Falsification: a planned reaction set is a matching.
        #[test]
        fn prop_plan_is_matching(seed in any::<u64>()) {
            let model = ChemistryModel::new(ChemistryConfig {
                seed,
                concentration: 2.0,
                ..Default::default()
            });
            let plan = plan_reactions(model.particles());
            let mut seen = std::collections::HashSet::new();
            for (i, j) in plan {
                prop_assert!(i < j);
                prop_assert!(seen.insert(i));
                prop_assert!(seen.insert(j));
            }
        }
    }
}
