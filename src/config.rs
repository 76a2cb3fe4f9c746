use crate::{Scalar, Vec2};
use eyre::WrapErr;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A struct containing all of the high-level parameters for the SPH simulation.
///
/// Positions are in screen coordinates: the domain spans `0..width` by `0..height`, and positive
/// `gravity` points towards larger `y`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphParameters {
    pub num_particles: usize,
    /// The density of the fluid without any forces
    pub rest_density: Scalar,
    /// The ideal gas constant used in the state equation pressure solver
    pub k: Scalar,
    /// The viscosity constant
    pub mu: Scalar,
    /// The radius of the smoothing kernel. Also the size of a spatial grid cell.
    pub h: Scalar,
    /// The mass of every particle
    pub mass: Scalar,
    /// The time step
    pub delta_time: Scalar,
    /// The acceleration of gravity along `y`
    pub gravity: Scalar,
    pub width: Scalar,
    pub height: Scalar,

    /// Distance from each wall at which particles are reflected
    #[serde(default = "defaults::wall_margin")]
    pub wall_margin: Scalar,
    /// Speeds above this are clamped back down to it
    #[serde(default = "defaults::max_speed")]
    pub max_speed: Scalar,
    /// Velocity multiplier applied to every particle at the end of each step
    #[serde(default = "defaults::drag")]
    pub drag: Scalar,
    /// The velocity damping at the boundary
    #[serde(default = "defaults::wall_damping")]
    pub wall_damping: Scalar,
    /// Number of steps per frame
    #[serde(default = "defaults::substeps")]
    pub substeps: usize,
    #[serde(default = "defaults::lattice_origin")]
    pub lattice_origin: Vec2,
    #[serde(default = "defaults::lattice_spacing")]
    pub lattice_spacing: Scalar,
}

mod defaults {
    use crate::{Scalar, Vec2};

    pub(super) fn wall_margin() -> Scalar {
        5.
    }

    pub(super) fn max_speed() -> Scalar {
        1000.
    }

    pub(super) fn drag() -> Scalar {
        0.995
    }

    pub(super) fn wall_damping() -> Scalar {
        0.5
    }

    pub(super) fn substeps() -> usize {
        5
    }

    pub(super) fn lattice_origin() -> Vec2 {
        Vec2::new(200., 50.)
    }

    pub(super) fn lattice_spacing() -> Scalar {
        10.
    }
}

impl Default for SphParameters {
    fn default() -> Self {
        Self {
            num_particles: 1000,
            rest_density: 1000.,
            k: 50.,
            mu: 250.,
            h: 16.,
            mass: 200.,
            delta_time: 0.0015,
            gravity: 3000.,
            width: 800.,
            height: 400.,
            wall_margin: defaults::wall_margin(),
            max_speed: defaults::max_speed(),
            drag: defaults::drag(),
            wall_damping: defaults::wall_damping(),
            substeps: defaults::substeps(),
            lattice_origin: defaults::lattice_origin(),
            lattice_spacing: defaults::lattice_spacing(),
        }
    }
}

impl SphParameters {
    /// Reads parameters from a JSON file and validates them.
    pub fn from_json_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let params: SphParameters = std::fs::read(path)
            .wrap_err_with(|| format!("Failed to read JSON settings file: {:?}", path))
            .and_then(|json| {
                serde_json::from_slice(&json).wrap_err("Serde failed to deserialize JSON.")
            })?;

        params
            .validate()
            .wrap_err_with(|| format!("Invalid parameters in {:?}", path))?;

        Ok(params)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        let finite = [
            ("rest_density", self.rest_density),
            ("k", self.k),
            ("mu", self.mu),
            ("h", self.h),
            ("mass", self.mass),
            ("delta_time", self.delta_time),
            ("gravity", self.gravity),
            ("width", self.width),
            ("height", self.height),
            ("wall_margin", self.wall_margin),
            ("max_speed", self.max_speed),
            ("drag", self.drag),
            ("wall_damping", self.wall_damping),
            ("lattice_spacing", self.lattice_spacing),
        ];
        for (name, value) in finite.iter() {
            if !value.is_finite() {
                return Err(eyre::eyre!("`{}` must be finite, got {}", name, value));
            }
        }

        let positive = [
            ("h", self.h),
            ("mass", self.mass),
            ("delta_time", self.delta_time),
            ("max_speed", self.max_speed),
        ];
        for (name, value) in positive.iter() {
            // `!(x > 0)` so that NaN is rejected too
            if !(*value > 0.) {
                return Err(eyre::eyre!("`{}` must be positive, got {}", name, value));
            }
        }

        if self.substeps == 0 {
            return Err(eyre::eyre!("`substeps` must be at least 1"));
        }

        if !(self.drag > 0. && self.drag <= 1.) {
            return Err(eyre::eyre!("`drag` must lie in (0, 1], got {}", self.drag));
        }

        if self.wall_margin < 0. {
            return Err(eyre::eyre!(
                "`wall_margin` must not be negative, got {}",
                self.wall_margin
            ));
        }

        if !(self.width > 2. * self.wall_margin && self.height > 2. * self.wall_margin) {
            return Err(eyre::eyre!(
                "Domain {}x{} is too small for a wall margin of {}",
                self.width,
                self.height,
                self.wall_margin
            ));
        }

        let origin = self.lattice_origin;
        if !(origin.x >= 0. && origin.x <= self.width && origin.y >= 0. && origin.y <= self.height)
        {
            return Err(eyre::eyre!(
                "`lattice_origin` ({}, {}) lies outside the {}x{} domain",
                origin.x,
                origin.y,
                self.width,
                self.height
            ));
        }

        Ok(())
    }

    /// The minimum corner particles are confined to.
    pub fn bounds_min(&self) -> Vec2 {
        Vec2::from_element(self.wall_margin)
    }

    /// The maximum corner particles are confined to.
    pub fn bounds_max(&self) -> Vec2 {
        Vec2::new(self.width - self.wall_margin, self.height - self.wall_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SphParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            SphParameters {
                h: 0.,
                ..Default::default()
            },
            SphParameters {
                delta_time: Scalar::NAN,
                ..Default::default()
            },
            SphParameters {
                drag: 1.5,
                ..Default::default()
            },
            SphParameters {
                substeps: 0,
                ..Default::default()
            },
            SphParameters {
                width: 10.,
                ..Default::default()
            },
            SphParameters {
                width: Scalar::INFINITY,
                ..Default::default()
            },
            SphParameters {
                height: Scalar::INFINITY,
                ..Default::default()
            },
            SphParameters {
                gravity: Scalar::NAN,
                ..Default::default()
            },
            SphParameters {
                k: Scalar::NEG_INFINITY,
                ..Default::default()
            },
            SphParameters {
                mu: Scalar::NAN,
                ..Default::default()
            },
            SphParameters {
                rest_density: Scalar::INFINITY,
                ..Default::default()
            },
            SphParameters {
                lattice_spacing: Scalar::NAN,
                ..Default::default()
            },
            SphParameters {
                lattice_origin: Vec2::new(-1e12, 50.),
                ..Default::default()
            },
            SphParameters {
                lattice_origin: Vec2::new(200., Scalar::NAN),
                ..Default::default()
            },
        ];

        for params in bad.iter() {
            assert!(params.validate().is_err(), "{:?} should be invalid", params);
        }
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let json = r#"{
            "num_particles": 4,
            "rest_density": 1000.0,
            "k": 50.0,
            "mu": 250.0,
            "h": 16.0,
            "mass": 200.0,
            "delta_time": 0.0015,
            "gravity": 3000.0,
            "width": 800.0,
            "height": 400.0
        }"#;

        let params: SphParameters = serde_json::from_str(json).unwrap();
        assert_eq!(
            params,
            SphParameters {
                num_particles: 4,
                ..Default::default()
            }
        );
    }

    #[test]
    fn required_fields_must_be_present() {
        let json = r#"{ "num_particles": 4, "h": 16.0 }"#;
        assert!(serde_json::from_str::<SphParameters>(json).is_err());
    }

    #[test]
    fn json_round_trip_through_file() {
        let params = SphParameters {
            num_particles: 25,
            gravity: 981.,
            ..Default::default()
        };

        let mut path = std::env::temp_dir();
        path.push(format!("sph2d_params_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_vec(&params).unwrap()).unwrap();

        let read = SphParameters::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(read, params);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(SphParameters::from_json_file("/nonexistent/sph2d/params.json").is_err());
    }
}
