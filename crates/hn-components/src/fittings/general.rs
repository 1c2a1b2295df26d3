//! Single-coefficient fittings: plain ζ, Kv, equivalent length, 3K, mitre bends.

use crate::common::{check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::friction::fully_turbulent_friction_factor;
use crate::valve::kv_to_zeta;
use hn_core::units::{Area, Length};
use uom::si::length::inch;

/// Crane equivalent-length ratio of a standard 90° elbow.
pub const STANDARD_ELBOW_ELR: f64 = 30.0;

/// Crane mitre-bend table: bend angle [°] against `ζ/f_T`.
const MITRE_BEND: [(f64, f64); 7] = [
    (0.0, 2.0),
    (15.0, 4.0),
    (30.0, 8.0),
    (45.0, 15.0),
    (60.0, 25.0),
    (75.0, 40.0),
    (90.0, 60.0),
];

/// Conduit data a fitting model may need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittingContext {
    pub diameter: Length,
    pub area: Area,
    pub roughness: Length,
    /// Reynolds number at design flow.
    pub reynolds: f64,
}

impl FittingContext {
    fn f_t(&self) -> ComponentResult<f64> {
        fully_turbulent_friction_factor(self.roughness.value / self.diameter.value)
    }
}

/// Fitting described by a single coefficient source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipeFitting {
    /// Coefficient known directly.
    Zeta(f64),
    /// Flow coefficient [m³/h at 1 bar].
    Kv(f64),
    /// Crane equivalent length ratio `L/D`.
    EquivalentLength(f64),
    /// Darby 3K constants.
    ThreeK { k1: f64, k_inf: f64, k_d: f64 },
    /// Mitre bend with the given deflection angle [°], 0..=90.
    MitreBend { angle_deg: f64 },
}

impl PipeFitting {
    /// Loss coefficient referenced to the conduit velocity.
    pub fn zeta(&self, ctx: &FittingContext) -> ComponentResult<f64> {
        let zeta = match *self {
            PipeFitting::Zeta(z) => z,
            PipeFitting::Kv(kv) => {
                check_positive(kv, "Kv")?;
                kv_to_zeta(kv, ctx.area)
            }
            PipeFitting::EquivalentLength(elr) => {
                check_non_negative(elr, "equivalent length ratio")?;
                elr * ctx.f_t()?
            }
            PipeFitting::ThreeK { k1, k_inf, k_d } => {
                check_positive(ctx.reynolds, "Reynolds number for 3K method")?;
                let d_in = ctx.diameter.get::<inch>();
                k1 / ctx.reynolds + k_inf * (1.0 + k_d / d_in.powf(0.3))
            }
            PipeFitting::MitreBend { angle_deg } => mitre_ratio(angle_deg)? * ctx.f_t()?,
        };
        check_non_negative(zeta, "fitting zeta must be finite and non-negative")
    }
}

fn mitre_ratio(angle_deg: f64) -> ComponentResult<f64> {
    if !(0.0..=90.0).contains(&angle_deg) {
        return Err(ComponentError::InvalidArg {
            what: "mitre bend angle must lie in 0..=90 degrees",
        });
    }
    for pair in MITRE_BEND.windows(2) {
        let (a0, n0) = pair[0];
        let (a1, n1) = pair[1];
        if angle_deg <= a1 {
            return Ok(n0 + (n1 - n0) * (angle_deg - a0) / (a1 - a0));
        }
    }
    Ok(MITRE_BEND[MITRE_BEND.len() - 1].1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hn_core::units::{m2, mm};
    use std::f64::consts::PI;

    fn ctx(d_mm: f64) -> FittingContext {
        let d = d_mm / 1000.0;
        FittingContext {
            diameter: mm(d_mm),
            area: m2(PI * d * d / 4.0),
            roughness: mm(0.046),
            reynolds: 1.0e5,
        }
    }

    #[test]
    fn standard_elbow_is_thirty_f_t() {
        let c = ctx(52.5);
        let z = PipeFitting::EquivalentLength(STANDARD_ELBOW_ELR)
            .zeta(&c)
            .unwrap();
        assert!((z - 30.0 * 0.019).abs() < 0.03, "zeta = {z}");
    }

    #[test]
    fn mitre_bend_interpolates() {
        assert_eq!(mitre_ratio(90.0).unwrap(), 60.0);
        assert_eq!(mitre_ratio(0.0).unwrap(), 2.0);
        assert!((mitre_ratio(37.5).unwrap() - 11.5).abs() < 1e-12);
        assert!(mitre_ratio(120.0).is_err());
    }

    #[test]
    fn kv_fitting_matches_valve_relation() {
        let c = ctx(20.0);
        let z = PipeFitting::Kv(5.0).zeta(&c).unwrap();
        assert!((z - kv_to_zeta(5.0, c.area)).abs() < 1e-12);
    }

    #[test]
    fn three_k_elbow_magnitude() {
        // Darby 90° standard threaded elbow: K1 = 800, Kinf = 0.14, Kd = 4.0
        let z = PipeFitting::ThreeK {
            k1: 800.0,
            k_inf: 0.14,
            k_d: 4.0,
        }
        .zeta(&ctx(52.5))
        .unwrap();
        assert!(z > 0.4 && z < 0.8, "zeta = {z}");
    }

    #[test]
    fn negative_zeta_rejected() {
        assert!(PipeFitting::Zeta(-1.0).zeta(&ctx(20.0)).is_err());
    }
}
