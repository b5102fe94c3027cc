//! Simulation driver
//!
//! `Simulation` owns the bodies, the parameters and the active force set,
//! and walks the lifecycle `Configuring -> Running -> Completed`. Bodies may
//! only be added while configuring so indices stay stable once stepping
//! begins.

use log::{debug, info};

use super::diagnostics;
use super::error::SimulationError;
use super::forces::{AccelSet, NewtonianGravity, NewtonianGravityPar};
use super::integrator::symplectic_euler;
use super::params::Parameters;
use super::states::{Body, NVec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configuring,
    Running,
    Completed,
}

pub struct Simulation {
    parameters: Parameters,
    bodies: Vec<Body>,
    forces: AccelSet,
    accel: Vec<NVec3>, // scratch, one entry per body
    steps: u64,
    phase: Phase,
}

impl Simulation {
    /// Create an empty simulation with Newtonian gravity as the only force
    pub fn new(parameters: Parameters) -> Result<Self, SimulationError> {
        parameters.validate()?;

        let forces = if parameters.parallel {
            AccelSet::new().with(NewtonianGravityPar {
                G: parameters.G,
                eps2: parameters.eps2,
            })
        } else {
            AccelSet::new().with(NewtonianGravity {
                G: parameters.G,
                eps2: parameters.eps2,
            })
        };

        Ok(Self {
            parameters,
            bodies: Vec::new(),
            forces,
            accel: Vec::new(),
            steps: 0,
            phase: Phase::Configuring,
        })
    }

    /// Create a simulation and add `bodies` in order
    pub fn with_bodies(parameters: Parameters, bodies: impl IntoIterator<Item = Body>) -> Result<Self, SimulationError> {
        let mut sim = Self::new(parameters)?;
        for body in bodies {
            sim.add_body(body)?;
        }
        Ok(sim)
    }

    /// Append a body. Only legal before the first step.
    pub fn add_body(&mut self, body: Body) -> Result<(), SimulationError> {
        if self.phase != Phase::Configuring {
            return Err(SimulationError::SimulationAlreadyRunning);
        }
        self.bodies.push(body);
        Ok(())
    }

    /// Advance every body by one time step
    ///
    /// A step on a completed simulation is a no-op. If the step fails the
    /// bodies and the clock are left exactly as they were.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        match self.phase {
            Phase::Completed => return Ok(()),
            Phase::Configuring => {
                debug!("starting simulation with {} bodies", self.bodies.len());
                self.phase = Phase::Running;
                self.accel = vec![NVec3::zeros(); self.bodies.len()];
            }
            Phase::Running => {}
        }

        if self.reached_end() {
            self.complete();
            return Ok(());
        }

        let t = self.current_time();
        symplectic_euler(&mut self.bodies, &self.forces, t, self.parameters.dt, &mut self.accel)?;
        self.steps += 1;

        if self.reached_end() {
            self.complete();
        }
        Ok(())
    }

    /// Step until `current_time >= t_end`, stopping at the first failure
    pub fn run(&mut self) -> Result<(), SimulationError> {
        self.run_with(|_| {})
    }

    /// Like [`Simulation::run`], calling `observer` after each successful step
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<(), SimulationError>
    where
        F: FnMut(&Simulation),
    {
        info!(
            "running {} bodies from t = {} to t = {} with dt = {}",
            self.bodies.len(),
            self.current_time(),
            self.parameters.t_end,
            self.parameters.dt,
        );
        while !self.is_complete() {
            let before = self.steps;
            self.step()?;
            if self.steps != before {
                observer(self);
            }
        }
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Number of completed steps
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `t_start + steps * dt`
    pub fn current_time(&self) -> f64 {
        self.parameters.t_start + self.steps as f64 * self.parameters.dt
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn kinetic_energy(&self) -> f64 {
        diagnostics::kinetic_energy(&self.bodies)
    }

    pub fn potential_energy(&self) -> f64 {
        diagnostics::potential_energy(&self.bodies, self.parameters.G, self.parameters.eps2)
    }

    pub fn total_energy(&self) -> f64 {
        diagnostics::total_energy(&self.bodies, self.parameters.G, self.parameters.eps2)
    }

    pub fn total_momentum(&self) -> NVec3 {
        diagnostics::total_momentum(&self.bodies)
    }

    pub fn angular_momentum(&self) -> NVec3 {
        diagnostics::angular_momentum(&self.bodies)
    }

    pub fn center_of_mass(&self) -> Option<NVec3> {
        diagnostics::center_of_mass(&self.bodies)
    }

    fn reached_end(&self) -> bool {
        self.current_time() >= self.parameters.t_end
    }

    fn complete(&mut self) {
        self.phase = Phase::Completed;
        debug!("simulation completed at t = {} after {} steps", self.current_time(), self.steps);
    }
}
