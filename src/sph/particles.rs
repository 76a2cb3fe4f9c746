use crate::{Scalar, Vec2};
use itertools::izip;

/// Contains all of the particle data. A particle is identified by its index, which never
/// changes: particles are only created when the simulation is.
#[derive(Clone, Debug, Default)]
pub struct SphParticles {
    pub position: Vec<Vec2>,
    pub velocity: Vec<Vec2>,
    /// Only meaningful after the first step.
    pub density: Vec<Scalar>,
    /// Only meaningful after the first step.
    pub pressure: Vec<Scalar>,
}

/// A copy of the state of one particle, handed out for drawing and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub density: Scalar,
    pub pressure: Scalar,
}

impl SphParticles {
    pub fn new(particles: impl IntoIterator<Item = (Vec2, Vec2)>) -> Self {
        let (position, velocity): (Vec<_>, Vec<_>) = particles.into_iter().unzip();
        let n = position.len();

        Self {
            position,
            velocity,
            density: vec![0.; n],
            pressure: vec![0.; n],
        }
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.position.get(index)?,
            velocity: self.velocity[index],
            density: self.density[index],
            pressure: self.pressure[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        izip!(&self.position, &self.velocity, &self.density, &self.pressure).map(
            |(&position, &velocity, &density, &pressure)| Particle {
                position,
                velocity,
                density,
                pressure,
            },
        )
    }
}
