//! Conserved quantities of a body set
//!
//! The potential uses the same softened distance as the force law, so the
//! total energy here is the quantity the integrator approximately conserves.

use super::states::{Body, NVec3};

pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// -sum over pairs of G m_i m_j / sqrt(|r|^2 + eps2)
#[allow(non_snake_case)]
pub fn potential_energy(bodies: &[Body], G: f64, eps2: f64) -> f64 {
    let mut u = 0.0;
    for (i, bi) in bodies.iter().enumerate() {
        for bj in &bodies[i + 1..] {
            let d2 = (bj.x - bi.x).norm_squared() + eps2;
            if d2 > 0.0 {
                u -= G * bi.mass() * bj.mass() / d2.sqrt();
            }
        }
    }
    u
}

#[allow(non_snake_case)]
pub fn total_energy(bodies: &[Body], G: f64, eps2: f64) -> f64 {
    kinetic_energy(bodies) + potential_energy(bodies, G, eps2)
}

pub fn total_momentum(bodies: &[Body]) -> NVec3 {
    bodies.iter().map(Body::momentum).sum()
}

/// Sum of m * (x cross v) about the origin
pub fn angular_momentum(bodies: &[Body]) -> NVec3 {
    bodies.iter().map(|b| b.mass() * b.x.cross(&b.v)).sum()
}

/// Mass-weighted mean position, `None` for an empty set
pub fn center_of_mass(bodies: &[Body]) -> Option<NVec3> {
    if bodies.is_empty() {
        return None;
    }
    let total: f64 = bodies.iter().map(Body::mass).sum();
    let weighted: NVec3 = bodies.iter().map(|b| b.mass() * b.x).sum();
    Some(weighted / total)
}
