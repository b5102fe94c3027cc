//! Core state type for the N-body simulation.
//!
//! A `Body` is a named point mass with a 3D position and velocity. The mass
//! is validated once at construction and never changes afterwards; position
//! and velocity are only written by the integrator.

use nalgebra::Vector3;

use super::error::SimulationError;

pub type NVec3 = Vector3<f64>;

/// Mass of the Sun in normalized (solar mass) units
pub const SUN_MASS: f64 = 1.0;

/// Mass of the Earth in solar masses
pub const EARTH_MASS: f64 = 3.0e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    name: String,
    mass: f64,
    pub(crate) x: NVec3, // position
    pub(crate) v: NVec3, // velocity
}

impl Body {
    /// Create a body, rejecting non-positive or non-finite masses
    pub fn new(name: impl Into<String>, mass: f64, position: NVec3, velocity: NVec3) -> Result<Self, SimulationError> {
        let name = name.into();
        // also catches NaN
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(SimulationError::InvalidMass { name, mass });
        }

        Ok(Self {
            name,
            mass,
            x: position,
            v: velocity,
        })
    }

    /// The Sun, one solar mass
    pub fn sun(position: NVec3, velocity: NVec3) -> Self {
        Self {
            name: "Sun".to_string(),
            mass: SUN_MASS,
            x: position,
            v: velocity,
        }
    }

    /// The Earth, 3e-6 solar masses
    pub fn earth(position: NVec3, velocity: NVec3) -> Self {
        Self {
            name: "Earth".to_string(),
            mass: EARTH_MASS,
            x: position,
            v: velocity,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> &NVec3 {
        &self.x
    }

    pub fn velocity(&self) -> &NVec3 {
        &self.v
    }

    /// Linear momentum m * v
    pub fn momentum(&self) -> NVec3 {
        self.mass * self.v
    }

    /// Kinetic energy 1/2 * m * |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.v.norm_squared()
    }

    /// Human readable, fixed-format description of the body
    ///
    /// ```text
    /// Name: Earth
    /// Mass: 3e-6
    /// Position: 1.000000, 0.000000, 0.000000
    /// Velocity: 0.000000, 1.000000, 0.000000
    /// ```
    pub fn render(&self) -> String {
        format!(
            "Name: {}\nMass: {}\nPosition: {:.6}, {:.6}, {:.6}\nVelocity: {:.6}, {:.6}, {:.6}",
            self.name, format_mass(self.mass), self.x.x, self.x.y, self.x.z, self.v.x, self.v.y, self.v.z,
        )
    }
}

/// Plain decimal in [1e-4, 1e6), exponent form outside it (like `%g`)
fn format_mass(m: f64) -> String {
    if (1e-4..1e6).contains(&m) {
        format!("{m}")
    } else {
        format!("{m:e}")
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
