pub mod config;
pub mod initial_condition;
pub mod sph;
pub mod statistics;

extern crate nalgebra as na;

pub use config::SphParameters;
pub use initial_condition::{InitialCondition, Lattice, ParticleList};
pub use sph::{Particle, SphSimulation, StepDiagnostics};
pub use statistics::{EnergyHistory, SimulationStatistics};

pub type Scalar = f64;
pub type Vec2 = na::Vector2<Scalar>;

pub trait Simulation {
    type Parameters;

    fn new(params: Self::Parameters) -> Self;

    /// Advances the simulation by exactly one time step.
    fn step(&mut self);

    /// The number of steps run for each externally observed frame.
    fn substeps(&self) -> usize;

    fn simulate_frame(&mut self) {
        for _ in 0..self.substeps() {
            self.step();
        }
    }
}
