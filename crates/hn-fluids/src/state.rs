//! Fluid state definition.

use crate::error::{FluidError, FluidResult};
use hn_core::units::{Pressure, Temperature};

/// Pressure and temperature at which fluid properties are evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidState {
    p: Pressure,
    t: Temperature,
}

impl FluidState {
    /// Create a state, rejecting non-positive or non-finite inputs.
    pub fn new(p: Pressure, t: Temperature) -> FluidResult<Self> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(Self { p, t })
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }
}
