//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait and direct Newtonian gravity, either as a
//! sequential pairwise sweep or as a rayon per-body gather. The sweep costs
//! n(n-1)/2 pair evaluations per call and the gather n(n-1), spread over the
//! pool. Either way practical N stays in the low thousands.

use rayon::prelude::*;

use super::error::SimulationError;
use super::states::{Body, NVec3};

/// Collection of acceleration terms
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self {
            terms: Vec::new()
        }
    }

    /// Add an acceleration term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: Acceleration + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all `bodies`
    /// - `out[i]` will be set to the sum of contributions from all terms
    /// - on error `out` holds partial sums and must be discarded
    pub fn accumulate_accels(&self, t: f64, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimulationError> {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(t, bodies, out)?;
        }
        Ok(())
    }
}

/// Acceleration sources operating on a body slice
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, t: f64, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimulationError>;
}

/// Newtonian gravity with Plummer softening, direct n^2 sum
///
/// The pair denominator is `(|r|^2 + eps2)^1.5`. Coincident bodies give a
/// zero pair term when `eps2 > 0`; with `eps2 == 0` they are reported as
/// [`SimulationError::Collision`], as is any pair close enough that
/// `G / d^3` overflows.
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant
    pub eps2: f64, // softening
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimulationError> {
        let n = bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let bi = &bodies[i];
            let xi = bi.x;
            let mi = bi.mass();

            for j in (i + 1)..n {
                let bj = &bodies[j];

                // r points from i to j: i is pulled along +r, j along -r
                let r = bj.x - xi;
                let coef = pair_coefficient(self.G, self.eps2, &r).ok_or(SimulationError::Collision { first: i, second: j })?;

                // a_i +=  G * m_j * r / |r_soft|^3
                // a_j += -G * m_i * r / |r_soft|^3
                out[i] += coef * bj.mass() * r;
                out[j] -= coef * mi * r;
            }
        }
        Ok(())
    }
}

/// Newtonian gravity evaluated per body on the rayon pool
///
/// Body `i` gathers over `j` in ascending order. Since `x_j - x_i` is the
/// exact negation of `x_i - x_j`, this reproduces [`NewtonianGravity`]
/// bit-for-bit, including which pair is reported on collision.
#[allow(non_snake_case)]
pub struct NewtonianGravityPar {
    pub G: f64,
    pub eps2: f64,
}

impl Acceleration for NewtonianGravityPar {
    fn acceleration(&self, _t: f64, bodies: &[Body], out: &mut [NVec3]) -> Result<(), SimulationError> {
        let results: Vec<Result<NVec3, SimulationError>> = (0..bodies.len())
            .into_par_iter()
            .map(|i| self.gather(i, bodies))
            .collect();

        // first error by body index, matching the sequential sweep
        for (a, res) in out.iter_mut().zip(results) {
            *a += res?;
        }
        Ok(())
    }
}

impl NewtonianGravityPar {
    fn gather(&self, i: usize, bodies: &[Body]) -> Result<NVec3, SimulationError> {
        let xi = bodies[i].x;
        let mut acc = NVec3::zeros();

        for (j, bj) in bodies.iter().enumerate() {
            if j == i {
                continue;
            }
            let r = bj.x - xi;
            let coef = pair_coefficient(self.G, self.eps2, &r).ok_or(SimulationError::Collision {
                first: i.min(j),
                second: i.max(j),
            })?;

            if j < i {
                // same rounding as the `out[j] -= ...` update of the pairwise sweep
                acc -= coef * bj.mass() * (xi - bj.x);
            } else {
                acc += coef * bj.mass() * r;
            }
        }
        Ok(acc)
    }
}

/// `G / (|r|^2 + eps2)^1.5`, or `None` when the pair is singular in f64:
/// coincident without softening, or so close that the coefficient overflows
fn pair_coefficient(g: f64, eps2: f64, r: &NVec3) -> Option<f64> {
    // Squared separation plus softening
    let d2 = r.dot(r) + eps2;
    if d2 == 0.0 {
        return None;
    }

    let inv_r = d2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    let coef = g * inv_r3;
    coef.is_finite().then_some(coef)
}
