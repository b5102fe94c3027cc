//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant `G` and softening `eps2`,
//! - step size, start and end time,
//! - whether the force sum runs on the rayon thread pool

use super::error::SimulationError;

/// Default squared softening length
pub const DEFAULT_EPS2: f64 = 1.0e-6;

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub G: f64, // gravitational constant
    pub dt: f64, // step size
    pub t_start: f64, // initial time
    pub t_end: f64, // time end
    pub eps2: f64, // softening, 0 disables it
    pub parallel: bool, // rayon force evaluation
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            G: 1.0,
            dt: 0.01,
            t_start: 0.0,
            t_end: 10.0,
            eps2: DEFAULT_EPS2,
            parallel: false,
        }
    }
}

impl Parameters {
    /// Check every field is usable by the integrator
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |name, value| Err(SimulationError::InvalidParameter { name, value });

        if !self.G.is_finite() {
            return invalid("G", self.G);
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return invalid("dt", self.dt);
        }
        if !self.t_start.is_finite() {
            return invalid("t_start", self.t_start);
        }
        // t_end may be infinite for open-ended runs driven by step()
        if self.t_end.is_nan() {
            return invalid("t_end", self.t_end);
        }
        if !(self.eps2 >= 0.0) || !self.eps2.is_finite() {
            return invalid("eps2", self.eps2);
        }
        Ok(())
    }
}
