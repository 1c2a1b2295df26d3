//! Fitting records and fitting resistance models.
//!
//! Every model reduces to a dimensionless loss coefficient `ζ` referenced to
//! the velocity of the conduit it is attached to. Attached coefficients are
//! kept per conduit in a [`FittingList`].

mod general;
mod tee;
mod transition;

pub use general::{FittingContext, PipeFitting, STANDARD_ELBOW_ELR};
pub use tee::{Tee, TeeCoefficients, TeeFlow};
pub use transition::{Enlarger, Reducer};

use crate::common::check_non_negative;
use crate::error::{ComponentError, ComponentResult};

/// One resistance coefficient attached to a conduit.
#[derive(Debug, Clone, PartialEq)]
pub struct Fitting {
    pub id: String,
    pub zeta: f64,
}

/// Ordered, append-only collection of fittings with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FittingList {
    items: Vec<Fitting>,
}

impl FittingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fitting; ids must be unique within the list.
    pub fn push(&mut self, zeta: f64, id: impl Into<String>) -> ComponentResult<()> {
        let id = id.into();
        check_non_negative(zeta, "fitting zeta must be finite and non-negative")?;
        if self.get(&id).is_some() {
            return Err(ComponentError::DuplicateFittingId { id });
        }
        self.items.push(Fitting { id, zeta });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Fitting> {
        self.items.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fitting> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all coefficients.
    pub fn zeta_total(&self) -> f64 {
        self.items.iter().map(|f| f.zeta).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_order_and_sums() {
        let mut list = FittingList::new();
        list.push(0.9, "tee").unwrap();
        list.push(0.3, "elbow").unwrap();
        let ids: Vec<&str> = list.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["tee", "elbow"]);
        assert!((list.zeta_total() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut list = FittingList::new();
        list.push(0.9, "tee").unwrap();
        let err = list.push(0.1, "tee").unwrap_err();
        assert_eq!(err, ComponentError::DuplicateFittingId { id: "tee".into() });
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn negative_zeta_rejected() {
        let mut list = FittingList::new();
        assert!(list.push(-0.1, "bad").is_err());
        assert!(list.is_empty());
    }
}
