use approx::{assert_abs_diff_eq, assert_relative_eq};

use nbsim::simulation::diagnostics;
use nbsim::{build_simulation, binary, sun_earth};
use nbsim::{AccelSet, Body, NVec3, NewtonianGravity, NewtonianGravityPar, Parameters, Phase, Simulation, SimulationError};
use nbsim::{ScenarioConfig, EARTH_MASS};

use std::path::PathBuf;

/// Build a simple 2-body set separated along x-axis
pub fn two_body_system(dist: f64, m1: f64, m2: f64) -> Vec<Body> {
    let b1 = Body::new("b1", m1, NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros()).unwrap();
    let b2 = Body::new("b2", m2, NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros()).unwrap();
    vec![b1, b2]
}

/// Four bodies in general position with nonzero net momentum
pub fn cluster() -> Vec<Body> {
    let layout = [
        ("a", 1.0, [0.3, -1.2, 0.5], [0.1, 0.2, 0.0]),
        ("b", 0.5, [1.4, 0.2, -0.3], [-0.3, 0.1, 0.2]),
        ("c", 2.0, [-0.9, 0.7, 0.1], [0.05, -0.2, 0.1]),
        ("d", 0.8, [0.1, 0.4, -1.1], [0.0, 0.0, -0.15]),
    ];
    layout.iter()
        .map(|(name, m, x, v)| Body::new(*name, *m, NVec3::from(*x), NVec3::from(*v)).unwrap())
        .collect()
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        G: 0.1,
        dt: 0.001,
        t_start: 0.0,
        t_end: 1.0,
        eps2: 0.0,
        parallel: false,
    }
}

/// Build a gravity term + AccelSet
pub fn gravity_set(p: &Parameters) -> AccelSet {
    AccelSet::new().with(NewtonianGravity {
        G: p.G,
        eps2: p.eps2,
    })
}

fn accels(forces: &AccelSet, bodies: &[Body]) -> Vec<NVec3> {
    let mut acc = vec![NVec3::zeros(); bodies.len()];
    forces.accumulate_accels(0.0, bodies, &mut acc).unwrap();
    acc
}

// ==================================================================================
// Body tests
// ==================================================================================

#[test]
fn body_rejects_non_positive_mass() {
    for m in [0.0, -1.0, -1e-300, f64::NAN, f64::INFINITY] {
        let res = Body::new("bad", m, NVec3::zeros(), NVec3::zeros());
        assert!(matches!(res, Err(SimulationError::InvalidMass { .. })), "mass {m} accepted");
    }
    assert!(Body::new("tiny", 1e-300, NVec3::zeros(), NVec3::zeros()).is_ok());
}

#[test]
fn body_render_is_fixed_format() {
    let b = Body::new("Earth", 3e-6, NVec3::new(1.0, -2.5, 0.0), NVec3::new(0.0, 1.0, 0.125)).unwrap();
    assert_eq!(
        b.render(),
        "Name: Earth\nMass: 3e-6\nPosition: 1.000000, -2.500000, 0.000000\nVelocity: 0.000000, 1.000000, 0.125000"
    );
    assert_eq!(b.to_string(), b.render());
}

#[test]
fn body_render_uses_exponent_outside_decimal_range() {
    let sun = Body::new("Sun", 1.98e30, NVec3::zeros(), NVec3::zeros()).unwrap();
    assert!(sun.render().contains("\nMass: 1.98e30\n"));

    let rock = Body::new("Rock", 250.5, NVec3::zeros(), NVec3::zeros()).unwrap();
    assert!(rock.render().contains("\nMass: 250.5\n"));
}

#[test]
fn presets_have_expected_mass() {
    let earth = Body::earth(NVec3::new(1.0, 0.0, 0.0), NVec3::zeros());
    assert_eq!(earth.name(), "Earth");
    assert_eq!(earth.mass(), EARTH_MASS);

    let sun = Body::sun(NVec3::zeros(), NVec3::zeros());
    assert_eq!(sun.name(), "Sun");
    assert_eq!(sun.mass(), 1.0);
}

// ==================================================================================
// Gravity tests
// ==================================================================================

#[test]
fn gravity_newton_third_law() {
    let bodies = two_body_system(1.0, 2.0, 3.0);
    let acc = accels(&gravity_set(&test_params()), &bodies);

    let f1 = acc[0] * bodies[0].mass();
    let f2 = acc[1] * bodies[1].mass();

    assert_relative_eq!(f1, -f2, max_relative = 1e-14);
}

#[test]
fn gravity_points_toward_other_body() {
    let bodies = two_body_system(2.0, 1.0, 1.0);
    let acc = accels(&gravity_set(&test_params()), &bodies);

    let dx = bodies[1].position() - bodies[0].position();
    assert!(acc[0].dot(&dx) > 0.0, "Acceleration is not toward second body");
    assert!(acc[1].dot(&dx) < 0.0, "Acceleration is not toward first body");
}

#[test]
fn gravity_inverse_square_law() {
    let p = test_params();
    let forces = gravity_set(&p);
    let acc_r = accels(&forces, &two_body_system(1.0, 1.0, 1.0));
    let acc_2r = accels(&forces, &two_body_system(2.0, 1.0, 1.0));

    let ratio = acc_r[0].norm() / acc_2r[0].norm();
    assert_relative_eq!(ratio, 4.0, max_relative = 1e-12);
    // |a| = G m / d^2
    assert_relative_eq!(acc_r[0].norm(), p.G, max_relative = 1e-12);
}

#[test]
fn gravity_sums_over_all_pairs() {
    let bodies = cluster();
    let p = Parameters { eps2: 1e-3, ..test_params() };
    let acc = accels(&gravity_set(&p), &bodies);

    for (i, bi) in bodies.iter().enumerate() {
        let mut expected = NVec3::zeros();
        for (j, bj) in bodies.iter().enumerate() {
            if i != j {
                let r = bj.position() - bi.position();
                expected += p.G * bj.mass() * r / (r.norm_squared() + p.eps2).powf(1.5);
            }
        }
        assert_relative_eq!(acc[i], expected, max_relative = 1e-12);
    }

    let net: NVec3 = acc.iter().zip(&bodies).map(|(a, b)| b.mass() * *a).sum();
    assert_abs_diff_eq!(net, NVec3::zeros(), epsilon = 1e-14);
}

#[test]
fn gravity_softening_prevents_blowup() {
    let mut p = test_params();
    p.eps2 = 0.1;

    let acc = accels(&gravity_set(&p), &two_body_system(1e-9, 1.0, 1.0));
    // peak of r / (r^2 + eps2)^1.5 is 2 / (3 sqrt(3) eps2)
    let bound = p.G * 2.0 / (3.0 * 3f64.sqrt() * p.eps2);
    assert!(acc[0].norm() <= bound, "Softening failed; acceleration too large");
}

#[test]
fn coincident_bodies_with_softening_feel_no_force() {
    let mut p = test_params();
    p.eps2 = 1e-6;

    let acc = accels(&gravity_set(&p), &two_body_system(0.0, 1.0, 1.0));
    assert!(acc.iter().all(|a| a.iter().all(|c| c.is_finite())));
    assert_eq!(acc[0], NVec3::zeros());
    assert_eq!(acc[1], NVec3::zeros());
}

#[test]
fn coincident_bodies_without_softening_collide() {
    let p = test_params();
    let mut bodies = two_body_system(1.0, 1.0, 1.0);
    bodies.extend(two_body_system(0.0, 1.0, 1.0));

    let mut acc = vec![NVec3::zeros(); bodies.len()];
    let err = gravity_set(&p).accumulate_accels(0.0, &bodies, &mut acc).unwrap_err();
    assert_eq!(err, SimulationError::Collision { first: 2, second: 3 });
}

#[test]
fn near_coincident_bodies_without_softening_collide() {
    // G / d^3 overflows although G m / d^2 would not
    let bodies = two_body_system(1e-110, 1.0, 1.0);
    for parallel in [false, true] {
        let p = Parameters { G: 1.0, parallel, ..test_params() };
        let mut sim = Simulation::with_bodies(p, bodies.clone()).unwrap();

        assert_eq!(sim.step(), Err(SimulationError::Collision { first: 0, second: 1 }));
        assert_eq!(sim.bodies(), &bodies[..]);
        assert_eq!(sim.steps(), 0);
        assert!(sim.bodies().iter().all(|b| b.velocity().iter().all(|c| c.is_finite())));
    }
}

#[test]
fn parallel_gravity_is_bit_identical() {
    let bodies = nbsim::benchmark::benchmark::make_bodies(300).unwrap();
    let (g, eps2) = (0.1, 1e-4);

    let seq = accels(&AccelSet::new().with(NewtonianGravity { G: g, eps2 }), &bodies);
    let par = accels(&AccelSet::new().with(NewtonianGravityPar { G: g, eps2 }), &bodies);
    assert_eq!(seq, par);
}

#[test]
fn parallel_gravity_reports_same_collision() {
    let mut bodies = cluster();
    bodies.push(bodies[1].clone());
    bodies.push(bodies[3].clone());

    let mut acc = vec![NVec3::zeros(); bodies.len()];
    let seq = AccelSet::new().with(NewtonianGravity { G: 1.0, eps2: 0.0 }).accumulate_accels(0.0, &bodies, &mut acc);
    let par = AccelSet::new().with(NewtonianGravityPar { G: 1.0, eps2: 0.0 }).accumulate_accels(0.0, &bodies, &mut acc);

    assert_eq!(seq, Err(SimulationError::Collision { first: 1, second: 4 }));
    assert_eq!(seq, par);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn integrator_updates_velocity_before_position() {
    let p = Parameters { G: 1.0, dt: 0.1, ..test_params() };
    let mut bodies = two_body_system(2.0, 1.0, 1.0);
    let mut acc = vec![NVec3::zeros(); 2];

    nbsim::symplectic_euler(&mut bodies, &gravity_set(&p), 0.0, p.dt, &mut acc).unwrap();

    // a = G m / d^2 = 0.25 toward the other body
    assert_relative_eq!(bodies[0].velocity().x, 0.025, max_relative = 1e-12);
    // drift uses the new velocity: x = -1 + 0.1 * 0.025
    assert_relative_eq!(bodies[0].position().x, -1.0 + 0.0025, max_relative = 1e-12);
    assert_relative_eq!(bodies[1].position().x, 1.0 - 0.0025, max_relative = 1e-12);
}

#[test]
fn integrator_leaves_state_untouched_on_collision() {
    let mut bodies = cluster();
    bodies.push(bodies[0].clone());
    let before = bodies.clone();
    let mut acc = vec![NVec3::zeros(); bodies.len()];

    let res = nbsim::symplectic_euler(&mut bodies, &gravity_set(&test_params()), 0.0, 0.01, &mut acc);
    assert!(matches!(res, Err(SimulationError::Collision { .. })));
    assert_eq!(bodies, before);
}

// ==================================================================================
// Simulation tests
// ==================================================================================

#[test]
fn lifecycle_configuring_running_completed() {
    let p = Parameters { dt: 0.25, t_end: 1.0, ..test_params() };
    let mut sim = Simulation::with_bodies(p, two_body_system(1.0, 1.0, 1.0)).unwrap();
    assert_eq!(sim.phase(), Phase::Configuring);

    sim.step().unwrap();
    assert_eq!(sim.phase(), Phase::Running);
    assert_eq!(sim.steps(), 1);
    assert_eq!(sim.current_time(), 0.25);

    sim.run().unwrap();
    assert_eq!(sim.phase(), Phase::Completed);
    assert_eq!(sim.steps(), 4);
    assert_eq!(sim.current_time(), 1.0);
}

#[test]
fn add_body_after_first_step_fails() {
    let mut sim = Simulation::with_bodies(test_params(), two_body_system(1.0, 1.0, 1.0)).unwrap();
    sim.add_body(Body::sun(NVec3::new(5.0, 0.0, 0.0), NVec3::zeros())).unwrap();
    assert_eq!(sim.bodies().len(), 3);

    sim.step().unwrap();
    let err = sim.add_body(Body::earth(NVec3::zeros(), NVec3::zeros())).unwrap_err();
    assert_eq!(err, SimulationError::SimulationAlreadyRunning);
    assert_eq!(sim.bodies().len(), 3);
}

#[test]
fn step_on_completed_simulation_is_noop() {
    let p = Parameters { dt: 0.1, t_end: 0.3, ..test_params() };
    let mut sim = Simulation::with_bodies(p, cluster()).unwrap();
    sim.run().unwrap();
    assert!(sim.is_complete());

    let before = sim.bodies().to_vec();
    let (steps, t) = (sim.steps(), sim.current_time());
    for _ in 0..3 {
        sim.step().unwrap();
    }
    assert_eq!(sim.bodies(), &before[..]);
    assert_eq!(sim.steps(), steps);
    assert_eq!(sim.current_time(), t);
}

#[test]
fn end_before_start_completes_without_stepping() {
    let p = Parameters { t_start: 5.0, t_end: 5.0, ..test_params() };
    let mut sim = Simulation::with_bodies(p, cluster()).unwrap();
    let before = sim.bodies().to_vec();

    sim.step().unwrap();
    assert!(sim.is_complete());
    assert_eq!(sim.steps(), 0);
    assert_eq!(sim.bodies(), &before[..]);
}

#[test]
fn failed_step_keeps_last_good_state() {
    let p = Parameters { dt: 0.01, ..test_params() };
    let mut bodies = cluster();
    bodies.push(bodies[2].clone());
    let before = bodies.clone();
    let mut sim = Simulation::with_bodies(p, bodies).unwrap();

    assert_eq!(sim.run(), Err(SimulationError::Collision { first: 2, second: 4 }));
    assert_eq!(sim.bodies(), &before[..]);
    assert_eq!(sim.steps(), 0);
    assert_eq!(sim.current_time(), 0.0);
    assert_eq!(sim.phase(), Phase::Running);
}

#[test]
fn invalid_parameters_are_rejected() {
    for p in [
        Parameters { dt: 0.0, ..test_params() },
        Parameters { dt: -0.1, ..test_params() },
        Parameters { dt: f64::NAN, ..test_params() },
        Parameters { eps2: -1e-6, ..test_params() },
        Parameters { G: f64::INFINITY, ..test_params() },
    ] {
        assert!(matches!(Simulation::new(p), Err(SimulationError::InvalidParameter { .. })));
    }
}

#[test]
fn run_with_observes_every_step() {
    let p = Parameters { dt: 0.1, t_end: 1.0, ..test_params() };
    let mut sim = Simulation::with_bodies(p, cluster()).unwrap();

    let mut seen = Vec::new();
    sim.run_with(|s| seen.push(s.steps())).unwrap();
    assert_eq!(seen, (1..=10).collect::<Vec<u64>>());
}

#[test]
fn momentum_is_conserved() {
    let p = Parameters { G: 1.0, eps2: 1e-3, t_end: 0.5, ..test_params() };
    let mut sim = Simulation::with_bodies(p, cluster()).unwrap();
    let p0 = sim.total_momentum();

    sim.run().unwrap();
    assert_eq!(sim.steps(), 500);
    assert_abs_diff_eq!(sim.total_momentum(), p0, epsilon = 1e-13);
}

#[test]
fn sun_earth_conserves_energy_and_angular_momentum() {
    let mut cfg = sun_earth();
    cfg.parameters.dt = 0.01;
    cfg.parameters.t_end = f64::INFINITY;
    let mut sim = build_simulation(&cfg).unwrap();

    let e0 = sim.total_energy();
    let l0 = sim.angular_momentum();
    let mut errs = Vec::new();
    for _ in 0..10_000 {
        sim.step().unwrap();
        errs.push(((sim.total_energy() - e0) / e0).abs());
    }

    let max_first = errs[..5_000].iter().cloned().fold(0.0, f64::max);
    let max_second = errs[5_000..].iter().cloned().fold(0.0, f64::max);
    assert!(max_second < 1e-3, "energy error {max_second}");
    // bounded oscillation, no secular drift
    assert!(max_second < 1.5 * max_first, "energy drifting: {max_first} -> {max_second}");
    assert_relative_eq!(sim.angular_momentum(), l0, max_relative = 1e-10);
}

#[test]
fn equal_mass_binary_stays_bound() {
    let mut sim = build_simulation(&binary()).unwrap();
    let e0 = sim.total_energy();
    let d0 = (sim.bodies()[1].position() - sim.bodies()[0].position()).norm();

    for _ in 0..1000 {
        sim.step().unwrap();
        let d = (sim.bodies()[1].position() - sim.bodies()[0].position()).norm();
        assert!(d < 2.0 * d0, "binary unbound: separation {d}");
    }
    assert_relative_eq!(sim.total_energy(), e0, max_relative = 0.01);
}

#[test]
fn replay_is_bit_identical() {
    let p = Parameters { G: 1.0, eps2: 1e-3, t_end: 0.2, ..test_params() };
    let mut a = Simulation::with_bodies(p.clone(), cluster()).unwrap();
    let mut b = Simulation::with_bodies(p.clone(), cluster()).unwrap();
    let mut c = Simulation::with_bodies(Parameters { parallel: true, ..p }, cluster()).unwrap();
    a.run().unwrap();
    b.run().unwrap();
    c.run().unwrap();

    assert_eq!(a.bodies(), b.bodies());
    assert_eq!(a.bodies(), c.bodies());
}

#[test]
fn diagnostics_of_empty_set() {
    assert_eq!(diagnostics::center_of_mass(&[]), None);
    assert_eq!(diagnostics::total_energy(&[], 1.0, 0.0), 0.0);
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn scenario_rejects_bad_mass() {
    let mut cfg = binary();
    cfg.bodies[1].m = -1.0;
    assert!(matches!(build_simulation(&cfg), Err(SimulationError::InvalidMass { .. })));
}

#[test]
fn bundled_scenarios_load() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["sun_earth.yaml", "binary.yaml", "figure_eight.yaml"] {
        let text = std::fs::read_to_string(dir.join(name)).unwrap();
        let cfg: ScenarioConfig = serde_yaml::from_str(&text).unwrap();
        let sim = build_simulation(&cfg).unwrap();
        assert!(!sim.bodies().is_empty(), "{name} has no bodies");
    }
}

#[test]
fn bundled_binary_matches_builtin() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join("binary.yaml");
    let cfg: ScenarioConfig = serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(cfg, binary());
}
