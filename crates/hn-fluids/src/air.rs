//! Dry air as an ideal gas with Sutherland viscosity.

use crate::error::FluidResult;
use crate::model::{FluidKind, FluidModel, validate_positive};
use crate::state::FluidState;
use hn_core::units::constants::R_AIR;
use hn_core::units::{Density, DynVisc, kgpm3, pas};

const MU_REF: f64 = 1.716e-5;
const T_REF: f64 = 273.15;
const SUTHERLAND_C: f64 = 110.4;

#[derive(Debug, Clone, Copy, Default)]
pub struct DryAir;

impl FluidModel for DryAir {
    fn name(&self) -> &str {
        "dry air"
    }

    fn kind(&self) -> FluidKind {
        FluidKind::DryAir
    }

    fn rho(&self, state: &FluidState) -> FluidResult<Density> {
        let rho = state.pressure().value / (R_AIR * state.temperature().value);
        Ok(kgpm3(validate_positive(rho, "air density")?))
    }

    fn mu(&self, state: &FluidState) -> FluidResult<DynVisc> {
        let t = state.temperature().value;
        let mu = MU_REF * (t / T_REF).powf(1.5) * (T_REF + SUTHERLAND_C) / (t + SUTHERLAND_C);
        Ok(pas(mu))
    }
}
