pub mod simulation;
pub mod configuration;
pub mod reporting;
pub mod benchmark;

pub use simulation::states::{Body, NVec3, EARTH_MASS, SUN_MASS};
pub use simulation::error::SimulationError;
pub use simulation::params::{Parameters, DEFAULT_EPS2};
pub use simulation::engine::{Phase, Simulation};
pub use simulation::forces::{Acceleration, AccelSet, NewtonianGravity, NewtonianGravityPar};
pub use simulation::integrator::symplectic_euler;
pub use simulation::scenario::{binary, build_simulation, sun_earth};

pub use configuration::config::{BodyConfig, ParametersConfig, ScenarioConfig};

pub use reporting::reporter::{CsvReporter, EveryNth, Reporter, TextReporter};

pub use benchmark::benchmark::{bench_gravity, bench_step};
