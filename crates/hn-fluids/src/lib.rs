//! hn-fluids: fluid properties for hydronet.
//!
//! Provides:
//! - `FluidState` (pressure + temperature)
//! - `FluidModel` trait returning density and dynamic viscosity
//! - `Water` (liquid correlations, 0..100 °C)
//! - `DryAir` (ideal gas + Sutherland viscosity)
//! - `ConstantProperties` for fixed-property fluids
//!
//! Pressure-loss calculations only need density and viscosity, so the trait is
//! deliberately narrow. A network evaluates its fluid once into a
//! [`PropertyPack`] and hands that to every conduit.
//!
//! # Example
//!
//! ```
//! use hn_core::units::{degc, pa};
//! use hn_fluids::{FluidModel, FluidState, Water};
//!
//! let state = FluidState::new(pa(300_000.0), degc(50.0)).unwrap();
//! let pack = Water.property_pack(&state).unwrap();
//! assert!((pack.rho.value - 988.0).abs() < 1.0);
//! ```

pub mod air;
pub mod constant;
pub mod error;
pub mod model;
pub mod state;
pub mod water;

pub use air::DryAir;
pub use constant::ConstantProperties;
pub use error::{FluidError, FluidResult};
pub use model::{FluidKind, FluidModel, PropertyPack};
pub use state::FluidState;
pub use water::Water;
