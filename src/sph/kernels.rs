//! Smoothing kernels from Müller et al., "Particle-Based Fluid Simulation for Interactive
//! Applications" (2003). All of them have compact support: they vanish for `r > h`.

use crate::{Scalar, Vec2};
use std::f64::consts::PI;

/// The density smoothing kernel, `315 / (64 π h⁹) (h² - r²)³`.
pub fn poly6(r: Scalar, h: Scalar) -> Scalar {
    if r >= 0. && r <= h {
        let c = 315. / (64. * PI * h.powi(9));
        let h2_sub_r2 = h * h - r * r;
        c * h2_sub_r2 * h2_sub_r2 * h2_sub_r2
    } else {
        0.
    }
}

/// Gradient of the spiky kernel, used for pressure forces. `r_ij` is the displacement from the
/// neighbor to the particle and `r` its length.
///
/// Zero at `r = 0`, where the direction is undefined.
pub fn spiky_grad(r_ij: Vec2, r: Scalar, h: Scalar) -> Vec2 {
    if r > 0. && r <= h {
        let c = -45. / (PI * h.powi(6));
        let h_sub_r = h - r;
        r_ij * (c * h_sub_r * h_sub_r / r)
    } else {
        Vec2::zeros()
    }
}

/// Laplacian of the viscosity kernel, `45 / (π h⁶) (h - r)`.
pub fn visc_laplacian(r: Scalar, h: Scalar) -> Scalar {
    if r >= 0. && r <= h {
        let c = 45. / (PI * h.powi(6));
        c * (h - r)
    } else {
        0.
    }
}
