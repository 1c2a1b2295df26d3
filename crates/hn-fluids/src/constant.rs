//! Fluid with fixed density and viscosity.

use crate::error::FluidResult;
use crate::model::{FluidKind, FluidModel, PropertyPack};
use crate::state::FluidState;
use hn_core::units::{Density, DynVisc};

/// Properties that do not depend on the fluid state (glycol mixes from a
/// datasheet, test fixtures).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantProperties {
    pack: PropertyPack,
}

impl ConstantProperties {
    pub fn new(rho: Density, mu: DynVisc) -> FluidResult<Self> {
        Ok(Self {
            pack: PropertyPack::new(rho, mu)?,
        })
    }
}

impl FluidModel for ConstantProperties {
    fn name(&self) -> &str {
        "constant properties"
    }

    fn kind(&self) -> FluidKind {
        FluidKind::Constant {
            rho: self.pack.rho.value,
            mu: self.pack.mu.value,
        }
    }

    fn rho(&self, _state: &FluidState) -> FluidResult<Density> {
        Ok(self.pack.rho)
    }

    fn mu(&self, _state: &FluidState) -> FluidResult<DynVisc> {
        Ok(self.pack.mu)
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use hn_core::units::{k, kgpm3, pa, pas};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn independent_of_state(p in 1.0e3_f64..1.0e7, t in 200.0_f64..500.0) {
            let fluid = ConstantProperties::new(kgpm3(1030.0), pas(2.0e-3)).unwrap();
            let state = FluidState::new(pa(p), k(t)).unwrap();
            let pack = fluid.property_pack(&state).unwrap();
            prop_assert_eq!(pack.rho.value, 1030.0);
            prop_assert_eq!(pack.mu.value, 2.0e-3);
        }
    }
}
