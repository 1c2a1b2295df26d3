//! Sizing helpers: diameters and duct widths for a target specific pressure
//! drop, and the flow a conduit passes at a given pressure drop.

use crate::common::{EPSILON_FLOW, check_finite, check_non_negative, check_positive};
use crate::conduit::Conduit;
use crate::cross_section::CrossSection;
use crate::error::{ComponentError, ComponentResult};
use crate::friction::{darcy_friction_factor, reynolds};
use hn_core::numeric::bisect;
use hn_core::units::{Length, Pressure, VolumeRate, m, m3ps, mm};
use hn_fluids::PropertyPack;

const SIZE_MIN_M: f64 = 1.0e-3;
const SIZE_MAX_M: f64 = 5.0;
const WIDTH_MAX_M: f64 = 20.0;
const BISECT_MAX_ITER: usize = 200;
const GROW_MAX: usize = 64;

/// Ordered set of commercially available inner diameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeSchedule {
    pub name: String,
    diameters: Vec<Length>,
}

impl PipeSchedule {
    pub fn new(name: impl Into<String>, mut diameters: Vec<Length>) -> ComponentResult<Self> {
        for d in &diameters {
            check_positive(d.value, "schedule diameter")?;
        }
        diameters.sort_by(|a, b| a.value.total_cmp(&b.value));
        diameters.dedup();
        Ok(Self {
            name: name.into(),
            diameters,
        })
    }

    /// Medium-series threaded steel tube (EN 10255), DN10 to DN100.
    pub fn steel_medium() -> Self {
        let inner = [12.5, 16.1, 21.7, 27.3, 36.0, 41.9, 53.1, 68.9, 80.9, 105.3];
        Self {
            name: "steel-medium".into(),
            diameters: inner.iter().map(|&d| mm(d)).collect(),
        }
    }

    pub fn diameters(&self) -> &[Length] {
        &self.diameters
    }

    /// Smallest diameter not below `min`.
    pub fn select(&self, min: Length) -> Option<Length> {
        self.diameters.iter().copied().find(|d| d.value >= min.value)
    }
}

/// Friction pressure drop per metre [Pa/m] of a straight conduit with
/// hydraulic diameter `d_h` and flow area `area`.
fn friction_gradient(
    flow: f64,
    d_h: f64,
    area: f64,
    roughness: f64,
    props: &PropertyPack,
) -> ComponentResult<f64> {
    let v = flow.abs() / area;
    if flow.abs() < EPSILON_FLOW {
        return Ok(0.0);
    }
    let f = darcy_friction_factor(reynolds(v, d_h, props.nu()), roughness / d_h)?;
    check_finite(f / d_h * 0.5 * props.rho.value * v * v, "specific pressure drop")
}

/// Friction pressure drop per metre [Pa/m] of a straight conduit at `flow`.
pub fn specific_pressure_drop(
    flow: VolumeRate,
    section: &CrossSection,
    roughness: Length,
    props: &PropertyPack,
) -> ComponentResult<f64> {
    section.validate()?;
    friction_gradient(
        flow.value,
        section.hydraulic_diameter().value,
        section.area().value,
        roughness.value,
        props,
    )
}

/// Circular diameter whose friction gradient at `flow` equals `target` [Pa/m].
pub fn size_circular(
    flow: VolumeRate,
    target_pa_per_m: f64,
    roughness: Length,
    props: &PropertyPack,
) -> ComponentResult<Length> {
    let q = check_positive(flow.value.abs(), "sizing flow")?;
    let target = check_positive(target_pa_per_m, "target specific pressure drop")?;
    let e = check_non_negative(roughness.value, "wall roughness")?;
    let residual = |d: f64| {
        let area = std::f64::consts::PI * d * d / 4.0;
        friction_gradient(q, d, area, e, props).map_or(f64::NAN, |r| r - target)
    };
    let d = bisect(residual, SIZE_MIN_M, SIZE_MAX_M, 1e-7, BISECT_MAX_ITER)?;
    Ok(m(d))
}

/// Width of a rectangular duct of fixed `height` whose friction gradient at
/// `flow` equals `target` [Pa/m].
pub fn size_rectangular_width(
    height: Length,
    flow: VolumeRate,
    target_pa_per_m: f64,
    roughness: Length,
    props: &PropertyPack,
) -> ComponentResult<Length> {
    let h = check_positive(height.value, "duct height")?;
    let q = check_positive(flow.value.abs(), "sizing flow")?;
    let target = check_positive(target_pa_per_m, "target specific pressure drop")?;
    let e = check_non_negative(roughness.value, "wall roughness")?;
    let residual = |w: f64| {
        let area = w * h;
        let d_h = 4.0 * area / (2.0 * (w + h));
        friction_gradient(q, d_h, area, e, props).map_or(f64::NAN, |r| r - target)
    };
    let w = bisect(residual, SIZE_MIN_M, WIDTH_MAX_M, 1e-7, BISECT_MAX_ITER)?;
    Ok(m(w))
}

/// Width of a rectangular duct of fixed `height` with the given
/// equivalent (equal friction) diameter.
pub fn width_for_equivalent_diameter(height: Length, d_e: Length) -> ComponentResult<Length> {
    check_positive(height.value, "duct height")?;
    let target = check_positive(d_e.value, "equivalent diameter")?;
    let residual = |w: f64| {
        CrossSection::rectangular(m(w), height)
            .equivalent_diameter()
            .value
            - target
    };
    let w = bisect(residual, SIZE_MIN_M, WIDTH_MAX_M, 1e-9, BISECT_MAX_ITER)?;
    Ok(m(w))
}

/// Flow through `conduit` that produces the start→end pressure drop `dp`,
/// at the conduit's current fittings and valve settings.
pub fn flow_for_pressure_drop(
    conduit: &Conduit,
    props: &PropertyPack,
    dp: Pressure,
) -> ComponentResult<VolumeRate> {
    if conduit.is_pseudo() {
        return Err(ComponentError::NotSupported {
            what: "flow through a pseudo conduit is not determined by its pressure drop",
        });
    }
    let target = check_finite(dp.value, "target pressure drop")?;
    if target == 0.0 {
        return Ok(m3ps(0.0));
    }
    let drop_at = |q: f64| -> ComponentResult<f64> {
        Ok(conduit.pressure_drop(props, m3ps(q))?.value)
    };

    // grow the bracket until it holds the target
    let mut hi = 1.0e-3;
    let mut grown = 0;
    while drop_at(hi)? < target.abs() {
        hi *= 2.0;
        grown += 1;
        if grown > GROW_MAX {
            return Err(ComponentError::ConvergenceFailed {
                what: "no flow reaches the target pressure drop",
            });
        }
    }

    let residual = |q: f64| drop_at(q).map_or(f64::NAN, |d| d - target.abs());
    let q = bisect(residual, 0.0, hi, hi * 1e-12, BISECT_MAX_ITER)?;
    Ok(m3ps(target.signum() * q))
}
