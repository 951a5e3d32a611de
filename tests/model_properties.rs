//! Falsification tests for model invariants.
//!
//! Property-based where the input space is continuous, table-driven where the
//! expected values are exact.

use edusim::prelude::*;
use edusim::scenarios::chemistry::{
    plan_reactions, ChemistryConfig, Particle, Species, CONCENTRATION, TEMPERATURE,
};
use edusim::scenarios::pendulum::{PendulumConfig, INITIAL_ANGLE};
use edusim::scenarios::population::{BIRTH_RATE, POPULATION_CAP, PREDATION_RATE};
use edusim::scenarios::quadratic::{QuadraticParams, SHOW_TANGENT, TANGENT_X};
use edusim::visualization::Point2;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Falsification: a frictionless swing exceeds its release amplitude
    #[test]
    fn pendulum_amplitude_never_grows(
        angle in 0.05f64..=std::f64::consts::FRAC_PI_2,
        length in 50.0f64..=200.0,
        gravity in 1.0f64..=20.0,
    ) {
        let mut model = PendulumModel::new(PendulumConfig::default());
        model.set_parameter("length", length).ok();
        model.set_parameter("gravity", gravity).ok();
        model.set_parameter(INITIAL_ANGLE, angle).ok();
        for _ in 0..4000 {
            model.advance(0.01);
            prop_assert!(model.state().angle.abs() <= angle + 1e-3);
        }
    }

    // Falsification: a population leaves [0, 100] or the histories diverge
    #[test]
    fn population_stays_clamped(
        birth in 0.0f64..=2.0,
        predation in 0.0f64..=1.0,
        steps in 1usize..400,
    ) {
        let mut model = PopulationModel::default();
        model.set_parameter(BIRTH_RATE, birth).ok();
        model.set_parameter(PREDATION_RATE, predation).ok();
        for _ in 0..steps {
            model.advance(0.5);
        }
        let frame = model.frame();
        prop_assert!((0.0..=POPULATION_CAP).contains(&frame.state.prey));
        prop_assert!((0.0..=POPULATION_CAP).contains(&frame.state.predator));
        prop_assert_eq!(frame.prey_history.len(), frame.predator_history.len());
        prop_assert_eq!(frame.prey_history.len(), (steps + 1).min(51));
        prop_assert_eq!(frame.prey_history.last().copied(), Some(frame.state.prey));
    }

    // Falsification: reaction bookkeeping fails to balance
    #[test]
    fn chemistry_reactions_balance(
        seed in any::<u64>(),
        temperature in 0.0f64..=100.0,
        concentration in 0.1f64..=2.0,
    ) {
        let mut model = ChemistryModel::new(ChemistryConfig { seed, ..Default::default() });
        model.set_parameter(TEMPERATURE, temperature).ok();
        model.set_parameter(CONCENTRATION, concentration).ok();
        let mut reactions = 0u64;
        for _ in 0..150 {
            let before = model.counts();
            let report = model.step();
            prop_assert_eq!(
                report.reactants_removed,
                before.reactant_a + before.reactant_b
                    - report.counts.reactant_a
                    - report.counts.reactant_b
            );
            prop_assert_eq!(report.reactants_removed, 2 * report.reactions);
            reactions += report.reactions as u64;
            for p in model.particles() {
                prop_assert!(p.is_inside(400.0, 300.0));
            }
        }
        prop_assert_eq!(model.product_count(), reactions);
    }

    // Falsification: the tangent misses the curve at its own abscissa
    #[test]
    fn quadratic_tangent_touches(
        a in -3i8..=3,
        b in -5i8..=5,
        c in -5i8..=5,
        x0 in -8.0f64..=8.0,
    ) {
        let mut model = QuadraticModel::default();
        model.set_parameter("a", f64::from(a)).ok();
        model.set_parameter("b", f64::from(b)).ok();
        model.set_parameter("c", f64::from(c)).ok();
        model.set_parameter(TANGENT_X, x0).ok();
        model.set_parameter(SHOW_TANGENT, 1.0).ok();
        let frame = model.frame();
        let tangent = frame.tangent;
        prop_assert!(tangent.is_some());
        if let Some(t) = tangent {
            prop_assert_eq!(t.point.y, frame.params.eval(t.point.x));
        }
        prop_assert_eq!(frame.points.first().map(|p| p.x), Some(-8.0));
        prop_assert_eq!(frame.points.last().map(|p| p.x), Some(8.0));
        for p in frame.points.iter().step_by(250) {
            prop_assert_eq!(p.y, frame.params.eval(p.x));
        }
    }
}

#[test]
fn population_step_matches_hand_computation() {
    let state = edusim::scenarios::PopulationState {
        prey: 20.0,
        predator: 5.0,
    };
    // prey: 20 + 0.5·20 − 0.2·100 = 10; predator: 5 + 0.1·0.2·100 − 0.5 = 6.5
    let next = state.next(0.5, 0.2);
    assert!((next.prey - 10.0).abs() < 1e-12);
    assert!((next.predator - 6.5).abs() < 1e-12);
}

#[test]
fn chemistry_particle_reacts_at_most_once_per_frame() {
    // One B sandwiched between two As and a second B overlapping both As.
    let still = |x: f64, species| Particle::new(Point2::new(x, 100.0), Point2::default(), 5.0, species);
    let particles = vec![
        still(100.0, Species::ReactantA),
        still(104.0, Species::ReactantB),
        still(108.0, Species::ReactantA),
        still(106.0, Species::ReactantB),
    ];
    let plan = plan_reactions(&particles);
    assert_eq!(plan, vec![(0, 1), (2, 3)]);

    let mut model = ChemistryModel::default();
    model.load_particles(particles);
    let report = model.step();
    assert_eq!(report.reactions, 2);
    assert_eq!(report.counts.product, 2);
    assert_eq!(report.counts.reactant_a + report.counts.reactant_b, 0);
}

#[test]
fn quadratic_strings() {
    let cases = [
        ((1.0, 2.0, 0.0), "y = x² + 2x", "f'(x) = 2x + 2"),
        ((0.0, 1.0, -1.0), "y = x - 1", "f'(x) = 1"),
        ((3.0, 0.0, 0.0), "y = 3x²", "f'(x) = 6x"),
        ((0.0, 0.0, 0.0), "y = 0", "f'(x) = 0"),
    ];
    for ((a, b, c), equation, derivative) in cases {
        let p = QuadraticParams::new(a, b, c);
        assert_eq!(p.equation(), equation);
        assert_eq!(p.derivative_equation(), derivative);
    }
}

#[test]
fn non_finite_parameters_rejected_without_change() {
    let mut model = PendulumModel::default();
    let before = model.parameters().get("length");
    assert!(matches!(
        model.set_parameter("length", f64::NAN),
        Err(SimError::InvalidParameter { .. })
    ));
    assert!(model.set_parameter("length", f64::INFINITY).is_err());
    assert_eq!(model.parameters().get("length"), before);
}
