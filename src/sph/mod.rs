pub mod grid;
pub mod kernels;
mod particles;

pub use particles::{Particle, SphParticles};

use grid::Grid;
use kernels::*;
use tracing::{debug, trace, warn};

use crate::initial_condition::{InitialCondition, Lattice};
use crate::{Scalar, Simulation, SphParameters, Vec2};

/// Neighbors with a density below this are left out of the force sums, since dividing by their
/// density would blow up.
pub const MIN_NEIGHBOR_DENSITY: Scalar = 1e-6;

/// Counters describing what happened during the most recent step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepDiagnostics {
    /// Neighbor interactions skipped because the neighbor's density was below
    /// `MIN_NEIGHBOR_DENSITY`.
    pub skipped_interactions: usize,
    /// Number of times a particle was reflected off a wall (per axis).
    pub wall_collisions: usize,
    /// Number of particles whose speed was clamped to `max_speed`.
    pub speed_clamps: usize,
}

pub struct SphSimulation {
    pub(crate) particles: SphParticles,
    grid: Grid,
    params: SphParameters,
    time: Scalar,
    step_count: usize,
    last_step: StepDiagnostics,
}

impl SphSimulation {
    pub fn with_initial_condition(
        mut params: SphParameters,
        initial_condition: &impl InitialCondition,
    ) -> Self {
        let particles = SphParticles::new(initial_condition.particles(&params));
        params.num_particles = particles.len();

        debug!(
            num_particles = params.num_particles,
            h = params.h,
            "Created SPH simulation"
        );

        SphSimulation {
            particles,
            grid: Grid::new(params.h),
            params,
            time: 0.,
            step_count: 0,
            last_step: StepDiagnostics::default(),
        }
    }

    pub fn params(&self) -> &SphParameters {
        &self.params
    }

    /// The spatial grid as of the start of the last step.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        self.particles.get(index)
    }

    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        self.particles.iter()
    }

    /// Simulated time in seconds.
    pub fn time(&self) -> Scalar {
        self.time
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn last_step_diagnostics(&self) -> StepDiagnostics {
        self.last_step
    }
}

impl Simulation for SphSimulation {
    type Parameters = SphParameters;

    fn new(params: SphParameters) -> Self {
        let lattice = Lattice::from_params(&params);
        Self::with_initial_condition(params, &lattice)
    }

    fn step(&mut self) {
        let mut diagnostics = StepDiagnostics::default();

        self.grid.insert(&self.particles.position);
        compute_densities(&mut self.particles, &self.grid, &self.params);
        compute_velocities(&mut self.particles, &self.grid, &self.params, &mut diagnostics);
        integrate(&mut self.particles, &self.params, &mut diagnostics);

        if diagnostics.skipped_interactions > 0 {
            warn!(
                step = self.step_count,
                skipped = diagnostics.skipped_interactions,
                "Skipped interactions with near-zero density neighbors"
            );
        }
        trace!(
            step = self.step_count,
            wall_collisions = diagnostics.wall_collisions,
            speed_clamps = diagnostics.speed_clamps,
            grid_cells = self.grid.num_cells(),
            spilled_cells = self.grid.measure_spilled(),
            "Finished step"
        );

        self.time += self.params.delta_time;
        self.step_count += 1;
        self.last_step = diagnostics;
    }

    fn substeps(&self) -> usize {
        self.params.substeps
    }
}

/// Density from every particle in the neighborhood (including the particle itself), then
/// pressure from the equation of state. Finishes for every particle before any forces are
/// computed.
fn compute_densities(s: &mut SphParticles, grid: &Grid, params: &SphParameters) {
    for i in 0..s.len() {
        let density = grid
            .nearby(&s.position[i])
            .map(|j| params.mass * poly6((s.position[i] - s.position[j]).magnitude(), params.h))
            .sum::<Scalar>();

        s.density[i] = density;
        s.pressure[i] = params.k * (density - params.rest_density);
    }
}

/// Accumulates gravity, pressure and viscosity and applies them to each velocity in turn.
///
/// Velocities are updated in place, in index order: particle `i` sees the new velocities of
/// neighbors `j < i` and the old ones of `j > i`.
fn compute_velocities(
    s: &mut SphParticles,
    grid: &Grid,
    params: &SphParameters,
    diagnostics: &mut StepDiagnostics,
) {
    let h = params.h;

    for i in 0..s.len() {
        let mut acceleration = Vec2::new(0., params.gravity);

        for j in grid.nearby(&s.position[i]) {
            if i == j {
                continue;
            }

            let r_ij = s.position[i] - s.position[j];
            let r = r_ij.magnitude();
            if r <= 0. || r > h {
                continue;
            }

            let density_j = s.density[j];
            if !(density_j >= MIN_NEIGHBOR_DENSITY) {
                diagnostics.skipped_interactions += 1;
                continue;
            }

            // Pressure. Dividing by `density_j` twice is deliberate.
            let pressure_term = -params.mass * (s.pressure[i] + s.pressure[j]) / (2. * density_j);
            acceleration += spiky_grad(r_ij, r, h) * (pressure_term / density_j);

            // Viscosity
            let vdiff = s.velocity[j] - s.velocity[i];
            acceleration += vdiff * (params.mu * visc_laplacian(r, h) / density_j);
        }

        s.velocity[i] += acceleration * params.delta_time;
    }
}

/// Moves every particle, then applies wall reflection, the speed cap and drag, in that order.
fn integrate(s: &mut SphParticles, params: &SphParameters, diagnostics: &mut StepDiagnostics) {
    let bounds_min = params.bounds_min();
    let bounds_max = params.bounds_max();

    for (position, velocity) in s.position.iter_mut().zip(s.velocity.iter_mut()) {
        *position += *velocity * params.delta_time;

        diagnostics.wall_collisions += update_bounds(
            position,
            velocity,
            params.wall_damping,
            bounds_min,
            bounds_max,
        );

        if velocity.magnitude() > params.max_speed {
            *velocity = velocity.normalize() * params.max_speed;
            diagnostics.speed_clamps += 1;
        }

        *velocity *= params.drag;
    }
}

/// Clamps `position` into the bounds, reflecting and damping the velocity along every axis that
/// was out of bounds. Returns the number of axes that were.
fn update_bounds(
    position: &mut Vec2,
    velocity: &mut Vec2,
    velocity_damping: Scalar,
    bounds_min: Vec2,
    bounds_max: Vec2,
) -> usize {
    let mut collisions = 0;
    for i in 0..2 {
        if position[i] < bounds_min[i] {
            velocity[i] *= -velocity_damping;
            position[i] = bounds_min[i];
            collisions += 1;
        }

        if position[i] > bounds_max[i] {
            velocity[i] *= -velocity_damping;
            position[i] = bounds_max[i];
            collisions += 1;
        }
    }
    collisions
}
