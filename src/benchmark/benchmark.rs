use std::time::Instant;

use log::warn;

use crate::simulation::engine::Simulation;
use crate::simulation::error::SimulationError;
use crate::simulation::forces::{Acceleration, NewtonianGravity, NewtonianGravityPar};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// Helper to build a deterministic cloud of `n` unit masses
pub fn make_bodies(n: usize) -> Result<Vec<Body>, SimulationError> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            Body::new(format!("b{i}"), 1.0, x, NVec3::zeros())
        })
        .collect()
}

fn make_params(parallel: bool) -> Parameters {
    Parameters {
        G: 0.1,
        dt: 0.001,
        t_start: 0.0,
        t_end: f64::INFINITY,
        eps2: 1e-4,
        parallel,
    }
}

/// Time one force evaluation, sequential vs rayon, for growing N
/// Paste output directly into a spreadsheet to graph
pub fn bench_gravity() -> Result<(), SimulationError> {
    println!("N,sequential_ms,parallel_ms");

    for n in [200, 400, 800, 1600, 3200] {
        let bodies = make_bodies(n)?;
        let p = make_params(false);
        let mut out = vec![NVec3::zeros(); n];

        let seq = NewtonianGravity { G: p.G, eps2: p.eps2 };
        let par = NewtonianGravityPar { G: p.G, eps2: p.eps2 };

        // Warm up
        seq.acceleration(0.0, &bodies, &mut out)?;
        out.fill(NVec3::zeros());
        par.acceleration(0.0, &bodies, &mut out)?;

        let t0 = Instant::now();
        seq.acceleration(0.0, &bodies, &mut out)?;
        let ms_seq = t0.elapsed().as_secs_f64() * 1000.0;

        let t1 = Instant::now();
        par.acceleration(0.0, &bodies, &mut out)?;
        let ms_par = t1.elapsed().as_secs_f64() * 1000.0;

        println!("{},{:.6},{:.6}", n, ms_seq, ms_par);
    }
    Ok(())
}

/// Time full simulation steps, sequential vs rayon, for growing N
pub fn bench_step() -> Result<(), SimulationError> {
    let steps = 5;
    println!("N,sequential_step_ms,parallel_step_ms");

    for n in [200, 400, 800, 1600] {
        let bodies = make_bodies(n)?;
        let mut sim_seq = Simulation::with_bodies(make_params(false), bodies.clone())?;
        let mut sim_par = Simulation::with_bodies(make_params(true), bodies)?;

        let t0 = Instant::now();
        for _ in 0..steps {
            sim_seq.step()?;
        }
        let ms_seq = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        let t1 = Instant::now();
        for _ in 0..steps {
            sim_par.step()?;
        }
        let ms_par = t1.elapsed().as_secs_f64() * 1000.0 / steps as f64;

        if sim_seq.bodies() != sim_par.bodies() {
            warn!("N = {n}: sequential and parallel states diverged");
        }
        println!("{},{:.6},{:.6}", n, ms_seq, ms_par);
    }
    Ok(())
}
