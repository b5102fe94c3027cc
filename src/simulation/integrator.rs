//! Fixed-step time integrator for the N-body system
//!
//! Semi-implicit (symplectic) Euler driven by an `AccelSet`. All
//! accelerations are evaluated from the pre-step positions before any body
//! is touched, so a failed force evaluation leaves the bodies unchanged.

use super::error::SimulationError;
use super::forces::AccelSet;
use super::states::{Body, NVec3};

/// Advance `bodies` by one step of size `dt` starting at time `t`
///
/// `accel` is scratch space and must hold one entry per body.
/// Time bookkeeping is left to the caller.
pub fn symplectic_euler(
    bodies: &mut [Body],
    forces: &AccelSet,
    t: f64,
    dt: f64,
    accel: &mut [NVec3],
) -> Result<(), SimulationError> {
    debug_assert_eq!(bodies.len(), accel.len());
    if bodies.is_empty() { // no bodies, return
        return Ok(());
    }

    // a_n from x_n at time t_n, before anything is mutated
    forces.accumulate_accels(t, bodies, accel)?;

    // Kick: v_n+1 = v_n + dt * a_n
    for (b, a) in bodies.iter_mut().zip(accel.iter()) {
        b.v += dt * *a;
    }

    // Drift with the new velocity: x_n+1 = x_n + dt * v_n+1
    for b in bodies.iter_mut() {
        b.x += dt * b.v;
    }

    Ok(())
}
