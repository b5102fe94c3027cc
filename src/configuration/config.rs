//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`BodyConfig`]       – name and initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A Sun/Earth scenario in normalized units:
//!
//! ```yaml
//! parameters:
//!   G: 1.0                  # gravitational constant
//!   dt: 0.001               # fixed step size
//!   t_start: 0.0            # optional, defaults to 0
//!   t_end: 6.283185307179586
//!   eps2: 1.0e-6            # optional softening epsilon^2, 0 disables it
//!   parallel: false         # optional, rayon force evaluation
//!
//! bodies:
//!   - name: Sun
//!     m: 1.0
//!     x: [0.0, 0.0, 0.0]
//!     v: [0.0, 0.0, 0.0]
//!   - name: Earth
//!     m: 3.0e-6
//!     x: [1.0, 0.0, 0.0]
//!     v: [0.0, 1.0, 0.0]
//! ```
//!
//! The config is turned into a runtime `Simulation` by
//! [`crate::simulation::scenario::build_simulation`], which is where masses
//! and parameters get validated.

use serde::{Deserialize, Serialize};

use crate::simulation::params::DEFAULT_EPS2;

/// Global numerical and physical parameters for a scenario
#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    pub G: f64,       // gravitational constant
    pub dt: f64,      // time step size
    #[serde(default)]
    pub t_start: f64, // start time
    pub t_end: f64,   // time end
    #[serde(default = "default_eps2")]
    pub eps2: f64,    // softening - prevent singular forces at very small separations
    #[serde(default)]
    pub parallel: bool, // evaluate forces on the rayon pool
}

fn default_eps2() -> f64 {
    DEFAULT_EPS2
}

/// Configuration for a single body's initial state
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    pub m: f64,      // Mass of the body
    pub x: [f64; 3], // Initial position in simulation units
    pub v: [f64; 3], // Initial velocity in simulation units per time unit
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // Global numerical and physical parameters
    pub bodies: Vec<BodyConfig>, // List of bodies that define the initial state of the system
}
