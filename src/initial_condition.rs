use crate::{Scalar, SphParameters, Vec2};

/// Describes where the particles of a simulation start out.
pub trait InitialCondition {
    /// The `(position, velocity)` of every particle. The length of this list is the particle
    /// count of the simulation.
    fn particles(&self, params: &SphParameters) -> Vec<(Vec2, Vec2)>;
}

/// A square lattice of `params.num_particles` particles at rest, filled row by row.
///
/// There are `floor(sqrt(n))` columns, and as many rows as it takes to place every particle.
pub struct Lattice {
    pub origin: Vec2,
    pub spacing: Scalar,
}

impl Lattice {
    pub fn from_params(params: &SphParameters) -> Self {
        Lattice {
            origin: params.lattice_origin,
            spacing: params.lattice_spacing,
        }
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Lattice::from_params(&SphParameters::default())
    }
}

impl InitialCondition for Lattice {
    fn particles(&self, params: &SphParameters) -> Vec<(Vec2, Vec2)> {
        let n = params.num_particles;
        let cols = ((n as Scalar).sqrt() as usize).max(1);

        (0..n)
            .map(|i| {
                let (x, y) = (i % cols, i / cols);
                let pos = self.origin + Vec2::new(x as Scalar, y as Scalar) * self.spacing;
                (pos, Vec2::zeros())
            })
            .collect()
    }
}

/// Particles placed explicitly. `params.num_particles` is ignored.
pub struct ParticleList(pub Vec<(Vec2, Vec2)>);

impl InitialCondition for ParticleList {
    fn particles(&self, _params: &SphParameters) -> Vec<(Vec2, Vec2)> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_fills_rows() {
        let params = SphParameters {
            num_particles: 10,
            ..Default::default()
        };
        let particles = Lattice::default().particles(&params);

        assert_eq!(particles.len(), 10);
        // floor(sqrt(10)) = 3 columns
        assert_eq!(particles[0].0, Vec2::new(200., 50.));
        assert_eq!(particles[2].0, Vec2::new(220., 50.));
        assert_eq!(particles[3].0, Vec2::new(200., 60.));
        assert_eq!(particles[9].0, Vec2::new(200., 80.));
        assert!(particles.iter().all(|(_, v)| *v == Vec2::zeros()));
    }

    #[test]
    fn lattice_is_deterministic() {
        let params = SphParameters::default();
        assert_eq!(
            Lattice::default().particles(&params),
            Lattice::default().particles(&params)
        );
    }

    #[test]
    fn empty_lattice() {
        let params = SphParameters {
            num_particles: 0,
            ..Default::default()
        };
        assert!(Lattice::default().particles(&params).is_empty());
    }
}
