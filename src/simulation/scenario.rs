//! Build fully-initialized simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime
//! `Simulation` with validated parameters and bodies at `t_start`. Also
//! provides the built-in scenarios used by the CLI and the tests.

use std::f64::consts::TAU;

use crate::configuration::config::{BodyConfig, ParametersConfig, ScenarioConfig};
use crate::simulation::engine::Simulation;
use crate::simulation::error::SimulationError;
use crate::simulation::params::{Parameters, DEFAULT_EPS2};
use crate::simulation::states::{Body, NVec3, EARTH_MASS, SUN_MASS};

impl From<&ParametersConfig> for Parameters {
    fn from(p: &ParametersConfig) -> Self {
        Self {
            G: p.G,
            dt: p.dt,
            t_start: p.t_start,
            t_end: p.t_end,
            eps2: p.eps2,
            parallel: p.parallel,
        }
    }
}

impl TryFrom<&BodyConfig> for Body {
    type Error = SimulationError;

    fn try_from(bc: &BodyConfig) -> Result<Self, Self::Error> {
        Body::new(bc.name.clone(), bc.m, NVec3::from(bc.x), NVec3::from(bc.v))
    }
}

impl From<&Body> for BodyConfig {
    fn from(b: &Body) -> Self {
        Self {
            name: b.name().to_string(),
            m: b.mass(),
            x: [b.position().x, b.position().y, b.position().z],
            v: [b.velocity().x, b.velocity().y, b.velocity().z],
        }
    }
}

/// Validate `cfg` and turn it into a simulation ready to step
pub fn build_simulation(cfg: &ScenarioConfig) -> Result<Simulation, SimulationError> {
    // Bodies: map `BodyConfig` -> runtime `Body`, failing on the first bad mass
    let bodies = cfg.bodies.iter().map(Body::try_from).collect::<Result<Vec<_>, _>>()?;
    Simulation::with_bodies(Parameters::from(&cfg.parameters), bodies)
}

/// Sun at the origin with the Earth on a circular orbit of radius 1,
/// normalized units (G = 1, solar masses), integrated for one period
pub fn sun_earth() -> ScenarioConfig {
    let sun = Body::sun(NVec3::zeros(), NVec3::zeros());
    // circular speed sqrt(G (M + m) / r) with G = r = 1
    let speed = (SUN_MASS + EARTH_MASS).sqrt();
    let earth = Body::earth(NVec3::new(1.0, 0.0, 0.0), NVec3::new(0.0, speed, 0.0));

    ScenarioConfig {
        parameters: ParametersConfig {
            G: 1.0,
            dt: 0.001,
            t_start: 0.0,
            t_end: TAU,
            eps2: DEFAULT_EPS2,
            parallel: false,
        },
        bodies: vec![BodyConfig::from(&sun), BodyConfig::from(&earth)],
    }
}

/// Two equal masses on a bound, slightly eccentric mutual orbit
pub fn binary() -> ScenarioConfig {
    ScenarioConfig {
        parameters: ParametersConfig {
            G: 1.0,
            dt: 0.01,
            t_start: 0.0,
            t_end: 10.0,
            eps2: DEFAULT_EPS2,
            parallel: false,
        },
        bodies: vec![
            BodyConfig {
                name: "A".to_string(),
                m: 1.0,
                x: [-0.5, 0.0, 0.0],
                v: [0.0, -0.35, 0.0],
            },
            BodyConfig {
                name: "B".to_string(),
                m: 1.0,
                x: [0.5, 0.0, 0.0],
                v: [0.0, 0.35, 0.0],
            },
        ],
    }
}
