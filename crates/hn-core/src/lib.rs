//! hn-core: shared foundation for hydronet.
//!
//! Contains:
//! - units (uom SI types + constructors for the quantities a pipe network needs)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for nodes, conduits, ports and loops)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{HnError, HnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
