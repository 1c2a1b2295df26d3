//! Fluid property model trait.

use crate::error::{FluidError, FluidResult};
use crate::state::FluidState;
use crate::{ConstantProperties, DryAir, Water};
use hn_core::units::{Density, DynVisc};

/// Density and viscosity evaluated once at a fluid state.
///
/// Conduits never talk to a [`FluidModel`] directly; the network builds one
/// pack per evaluation and passes it down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyPack {
    pub rho: Density,
    pub mu: DynVisc,
}

impl PropertyPack {
    pub fn new(rho: Density, mu: DynVisc) -> FluidResult<Self> {
        validate_positive(rho.value, "density must be positive and finite")?;
        validate_positive(mu.value, "viscosity must be positive and finite")?;
        Ok(Self { rho, mu })
    }

    /// Kinematic viscosity [m²/s].
    pub fn nu(&self) -> f64 {
        self.mu.value / self.rho.value
    }
}

/// Which concrete model a fluid is; used to persist a network's fluid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FluidKind {
    Water,
    DryAir,
    Constant { rho: f64, mu: f64 },
}

impl FluidKind {
    /// Instantiate the model this kind describes.
    pub fn model(self) -> FluidResult<Box<dyn FluidModel>> {
        Ok(match self {
            FluidKind::Water => Box::new(Water),
            FluidKind::DryAir => Box::new(DryAir),
            FluidKind::Constant { rho, mu } => Box::new(ConstantProperties::new(
                hn_core::units::kgpm3(rho),
                hn_core::units::pas(mu),
            )?),
        })
    }
}

/// Trait for fluid property models.
///
/// Implementations must be thread-safe so independent networks can be solved
/// on a thread pool.
pub trait FluidModel: Send + Sync + std::fmt::Debug {
    /// Model name (for logging).
    fn name(&self) -> &str;

    /// The persisted description of this model.
    fn kind(&self) -> FluidKind;

    /// Density [kg/m³] at the given state.
    fn rho(&self, state: &FluidState) -> FluidResult<Density>;

    /// Dynamic viscosity [Pa·s] at the given state.
    fn mu(&self, state: &FluidState) -> FluidResult<DynVisc>;

    /// Evaluate density and viscosity together.
    fn property_pack(&self, state: &FluidState) -> FluidResult<PropertyPack> {
        PropertyPack::new(self.rho(state)?, self.mu(state)?)
    }
}

pub(crate) fn validate_positive(value: f64, what: &'static str) -> FluidResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FluidError::NonPhysical { what })
    }
}
