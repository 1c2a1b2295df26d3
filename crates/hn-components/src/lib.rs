//! hn-components: conduit and resistance models for hydronet.
//!
//! Provides:
//! - Cross sections (circular, rectangular, flat-oval) with hydraulic and
//!   equivalent diameters
//! - Darcy friction factor (laminar / Colebrook-White)
//! - Fitting records and fitting resistance models (tees, reducers,
//!   enlargers, Kv, 3K, equivalent length, mitre bends)
//! - Control and balancing valves
//! - The `Conduit` model that combines all of the above into a pressure drop
//! - Sizing helpers (diameter for a target specific pressure drop, duct width,
//!   flow for a given pressure drop)
//!
//! All models are deterministic functions of their parameters, the flow rate
//! and a fluid [`PropertyPack`](hn_fluids::PropertyPack).
//!
//! # Example
//!
//! ```
//! use hn_components::{Conduit, CrossSection, PipeGeometry};
//! use hn_core::units::{kgpm3, lps, m, mm, pas};
//! use hn_fluids::PropertyPack;
//!
//! let geometry = PipeGeometry::new(
//!     m(10.0),
//!     CrossSection::circular(mm(20.0)),
//!     mm(0.04),
//! ).unwrap();
//! let mut pipe = Conduit::pipe(geometry, lps(0.3));
//! pipe.add_fitting(0.5, "elbow-1").unwrap();
//!
//! let water = PropertyPack::new(kgpm3(988.0), pas(5.5e-4)).unwrap();
//! let dp = pipe.pressure_drop(&water, lps(0.3)).unwrap();
//! assert!(dp.value > 0.0);
//! ```

pub mod common;
pub mod conduit;
pub mod cross_section;
pub mod error;
pub mod fittings;
pub mod friction;
pub mod sizing;
pub mod valve;

pub use conduit::{Conduit, ConduitKind, ConduitMode, PipeGeometry, PressureDropParts};
pub use cross_section::CrossSection;
pub use error::{ComponentError, ComponentResult};
pub use fittings::{
    Enlarger, Fitting, FittingContext, FittingList, PipeFitting, Reducer, Tee, TeeCoefficients,
    TeeFlow,
};
pub use sizing::PipeSchedule;
pub use valve::{BalancingValve, ControlValve, ValveCharacteristic};
