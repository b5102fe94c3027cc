//! Error type shared by body construction, parameter validation and stepping

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Body mass was zero, negative or not finite
    InvalidMass { name: String, mass: f64 },
    /// Two bodies share a position while softening is disabled
    Collision { first: usize, second: usize },
    /// Bodies can only be added before the first step
    SimulationAlreadyRunning,
    /// A simulation parameter is out of range
    InvalidParameter { name: &'static str, value: f64 },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMass { name, mass } => {
                write!(f, "Invalid mass for body '{name}': {mass} (must be > 0)")
            }
            Self::Collision { first, second } => {
                write!(f, "Bodies {first} and {second} coincide with softening disabled")
            }
            Self::SimulationAlreadyRunning => {
                write!(f, "Cannot add bodies once the simulation has started")
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter {name}: {value}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
