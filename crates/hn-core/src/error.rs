use thiserror::Error;

pub type HnResult<T> = Result<T, HnError>;

/// Errors shared by every hydronet crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HnError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The function has the same sign at both ends of the search interval.
    #[error("No root between {lo} and {hi}")]
    NoRootInBracket { lo: f64, hi: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
