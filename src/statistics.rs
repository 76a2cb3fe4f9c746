use crate::SphSimulation;
use crate::{Scalar, Vec2};
use itertools::izip;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Read-only diagnostics. None of these modify the simulation.
pub trait SimulationStatistics {
    fn total_mass(&self) -> Scalar;
    fn total_linear_momentum(&self) -> Vec2;
    /// The z-component of the angular momentum about the origin.
    fn total_angular_momentum(&self) -> Scalar;
    fn total_kinetic_energy(&self) -> Scalar;
    fn total_volume(&self) -> Scalar;
}

impl SimulationStatistics for SphSimulation {
    fn total_mass(&self) -> Scalar {
        self.params().mass * self.num_particles() as Scalar
    }

    fn total_linear_momentum(&self) -> Vec2 {
        let mass = self.params().mass;
        self.particles.velocity.iter().map(|v| mass * v).sum()
    }

    fn total_angular_momentum(&self) -> Scalar {
        let mass = self.params().mass;
        izip!(&self.particles.position, &self.particles.velocity)
            .map(|(x, v)| mass * x.perp(v))
            .sum()
    }

    fn total_kinetic_energy(&self) -> Scalar {
        let mass = self.params().mass;
        self.particles
            .velocity
            .iter()
            .map(|v| 0.5 * mass * v.magnitude_squared())
            .sum()
    }

    fn total_volume(&self) -> Scalar {
        let mass = self.params().mass;
        self.particles
            .density
            .iter()
            .filter(|&&rho| rho > 0.)
            .map(|rho| mass / rho)
            .sum()
    }
}

/// The most recent per-frame energy samples, oldest first. Once `capacity` samples have been
/// recorded, each new sample evicts the oldest. Storage grows with the samples actually pushed,
/// not with `capacity`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnergyHistory {
    capacity: usize,
    samples: VecDeque<Scalar>,
}

impl EnergyHistory {
    pub fn new(capacity: usize) -> Self {
        EnergyHistory {
            capacity,
            samples: VecDeque::new(),
        }
    }

    pub fn push(&mut self, energy: Scalar) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(energy);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<Scalar> {
        self.samples.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Scalar> + '_ {
        self.samples.iter().copied()
    }

    /// The largest sample, or `1.` if there are none or they are all zero, so it is always safe
    /// to divide by.
    pub fn max(&self) -> Scalar {
        let max = self.samples.iter().copied().fold(0., Scalar::max);
        if max == 0. {
            1.
        } else {
            max
        }
    }

    /// Every sample scaled by `max()`.
    pub fn normalized(&self) -> impl Iterator<Item = Scalar> + '_ {
        let max = self.max();
        self.iter().map(move |e| e / max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParticleList, Simulation, SphParameters};

    fn sim(particles: Vec<(Vec2, Vec2)>) -> SphSimulation {
        SphSimulation::with_initial_condition(SphParameters::default(), &ParticleList(particles))
    }

    #[test]
    fn kinetic_energy() {
        let s = sim(vec![
            (Vec2::new(100., 100.), Vec2::new(3., 4.)),
            (Vec2::new(300., 100.), Vec2::new(0., -2.)),
        ]);

        assert_eq!(s.total_kinetic_energy(), 0.5 * 200. * 25. + 0.5 * 200. * 4.);
        assert_eq!(s.total_mass(), 400.);
        assert_eq!(s.total_linear_momentum(), Vec2::new(600., 400.));
        // x × v = 100 * 4 - 100 * 3 and 300 * -2 - 100 * 0
        assert_eq!(s.total_angular_momentum(), 200. * 100. + 200. * -600.);
    }

    #[test]
    fn statistics_do_not_modify() {
        let mut s = SphSimulation::new(SphParameters {
            num_particles: 49,
            ..Default::default()
        });
        s.step();

        let before = s.particles().collect::<Vec<_>>();
        let e1 = s.total_kinetic_energy();
        let e2 = s.total_kinetic_energy();
        s.total_volume();

        assert_eq!(e1, e2);
        assert!(s.particles().eq(before.into_iter()));
    }

    #[test]
    fn volume_before_first_step_is_zero() {
        let s = sim(vec![(Vec2::new(100., 100.), Vec2::zeros())]);
        assert_eq!(s.total_volume(), 0.);
    }

    #[test]
    fn energy_history_is_bounded() {
        let mut history = EnergyHistory::new(3);
        for e in &[1., 4., 2., 8.] {
            history.push(*e);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().collect::<Vec<_>>(), vec![4., 2., 8.]);
        assert_eq!(history.latest(), Some(8.));
        assert_eq!(history.normalized().collect::<Vec<_>>(), vec![0.5, 0.25, 1.]);
    }

    #[test]
    fn energy_history_huge_capacity() {
        let mut history = EnergyHistory::new(usize::MAX);
        history.push(2.);
        history.push(3.);

        assert_eq!(history.iter().collect::<Vec<_>>(), vec![2., 3.]);
    }

    #[test]
    fn energy_history_max_never_zero() {
        let mut history = EnergyHistory::new(4);
        assert_eq!(history.max(), 1.);

        history.push(0.);
        history.push(0.);
        assert_eq!(history.max(), 1.);
        assert_eq!(history.normalized().collect::<Vec<_>>(), vec![0., 0.]);
    }
}
