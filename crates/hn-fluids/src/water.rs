//! Liquid water between 0 and 100 °C.
//!
//! Density follows the Thiesen-Scheel-Diesselhorst equation, viscosity the
//! Vogel-Fulcher-Tammann fit. Pressure dependence is neglected.

use crate::error::{FluidError, FluidResult};
use crate::model::{FluidKind, FluidModel};
use crate::state::FluidState;
use hn_core::units::constants::ZERO_CELSIUS_K;
use hn_core::units::{Density, DynVisc, kgpm3, pas};

const T_MIN_C: f64 = 0.0;
const T_MAX_C: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Water;

impl Water {
    fn celsius(state: &FluidState) -> FluidResult<f64> {
        let t_c = state.temperature().value - ZERO_CELSIUS_K;
        if !(T_MIN_C..=T_MAX_C).contains(&t_c) {
            return Err(FluidError::OutOfRange {
                what: "liquid water temperature [°C]",
                value: t_c,
            });
        }
        Ok(t_c)
    }
}

impl FluidModel for Water {
    fn name(&self) -> &str {
        "water"
    }

    fn kind(&self) -> FluidKind {
        FluidKind::Water
    }

    fn rho(&self, state: &FluidState) -> FluidResult<Density> {
        let t = Self::celsius(state)?;
        let rho = 1000.0
            * (1.0 - (t + 288.9414) / (508_929.2 * (t + 68.129_63)) * (t - 3.9863).powi(2));
        Ok(kgpm3(rho))
    }

    fn mu(&self, state: &FluidState) -> FluidResult<DynVisc> {
        Self::celsius(state)?;
        let t_k = state.temperature().value;
        Ok(pas(2.414e-5 * 10f64.powf(247.8 / (t_k - 140.0))))
    }
}
