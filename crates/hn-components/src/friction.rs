//! Darcy friction factor.

use crate::common::check_finite;
use crate::error::{ComponentError, ComponentResult};

/// Reynolds number below which flow is treated as laminar.
pub const RE_LAMINAR: f64 = 2300.0;

const COLEBROOK_MAX_ITER: usize = 50;
const COLEBROOK_TOL: f64 = 1e-12;

/// `Re = v·D/ν`.
pub fn reynolds(velocity: f64, diameter: f64, kinematic_viscosity: f64) -> f64 {
    velocity.abs() * diameter / kinematic_viscosity
}

/// Swamee-Jain explicit approximation of Colebrook-White.
pub fn swamee_jain(reynolds: f64, rel_roughness: f64) -> f64 {
    let a = rel_roughness / 3.7;
    let b = 5.74 / reynolds.powf(0.9);
    (0.25 / (a + b).log10().powi(2)).max(1e-4)
}

/// Colebrook-White, solved by fixed-point iteration on `1/sqrt(f)`
/// starting from the Swamee-Jain estimate.
pub fn colebrook(reynolds: f64, rel_roughness: f64) -> ComponentResult<f64> {
    let mut x = 1.0 / swamee_jain(reynolds, rel_roughness).sqrt();
    for _ in 0..COLEBROOK_MAX_ITER {
        let next = -2.0 * (rel_roughness / 3.7 + 2.51 * x / reynolds).log10();
        check_finite(next, "Colebrook iterate")?;
        if (next - x).abs() < COLEBROOK_TOL * x {
            return Ok(1.0 / (next * next));
        }
        x = next;
    }
    Err(ComponentError::ConvergenceFailed {
        what: "Colebrook-White friction factor",
    })
}

/// Darcy friction factor: `64/Re` when laminar, Colebrook-White otherwise.
pub fn darcy_friction_factor(reynolds: f64, rel_roughness: f64) -> ComponentResult<f64> {
    if !(reynolds.is_finite() && reynolds > 0.0) {
        return Err(ComponentError::NonPhysical {
            what: "Reynolds number must be positive",
        });
    }
    if reynolds < RE_LAMINAR {
        Ok(64.0 / reynolds)
    } else {
        colebrook(reynolds, rel_roughness)
    }
}

/// Friction factor in the fully rough zone (`Re → ∞`), the `f_T` of the
/// Crane equivalent-length method.
pub fn fully_turbulent_friction_factor(rel_roughness: f64) -> ComponentResult<f64> {
    if !(rel_roughness.is_finite() && rel_roughness > 0.0) {
        return Err(ComponentError::NotSupported {
            what: "fully turbulent friction factor of a hydraulically smooth wall",
        });
    }
    Ok(0.25 / (rel_roughness / 3.7).log10().powi(2))
}
