//! Error types for component operations.

use hn_core::HnError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Fitting id '{id}' is already attached to this conduit")]
    DuplicateFittingId { id: String },

    #[error("Numeric error: {message}")]
    Numeric { message: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<HnError> for ComponentError {
    fn from(e: HnError) -> Self {
        match e {
            HnError::NonFinite { what, .. } => ComponentError::NonPhysical { what },
            HnError::InvalidArg { what } => ComponentError::InvalidArg { what },
            other => ComponentError::Numeric {
                message: other.to_string(),
            },
        }
    }
}

impl From<ComponentError> for HnError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what }
            | ComponentError::NotSupported { what }
            | ComponentError::ConvergenceFailed { what }
            | ComponentError::InvalidArg { what } => HnError::InvalidArg { what },
            other => HnError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::DuplicateFittingId {
            id: "tee-S1".into(),
        };
        assert!(err.to_string().contains("tee-S1"));
    }

    #[test]
    fn error_conversion() {
        let hn: HnError = ComponentError::InvalidArg { what: "test" }.into();
        assert!(matches!(hn, HnError::InvalidArg { .. }));

        let back: ComponentError = HnError::NonFinite {
            what: "dp",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(back, ComponentError::NonPhysical { what: "dp" }));
    }
}
