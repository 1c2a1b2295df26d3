//! Error types for network analysis and balancing.

use std::collections::BTreeMap;

use hn_components::ComponentError;
use hn_core::units::Pressure;
use hn_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur while analysing or balancing a network.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Unknown conduit '{name}'")]
    UnknownConduit { name: String },

    #[error(
        "Hardy Cross did not converge within {iterations} iterations \
         (largest loop imbalance {:.3} Pa)",
        max_abs_pa(.imbalances)
    )]
    MaxIterationsExceeded {
        iterations: usize,
        imbalances: BTreeMap<String, Pressure>,
    },

    #[error("Invalid target authority {authority}: {what}")]
    InvalidTargetAuthority { authority: f64, what: &'static str },

    #[error("Balancing is infeasible: {what}")]
    InfeasibleBalancing { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Graph error: {0}")]
    Graph(#[from] hn_graph::GraphError),
}

pub type SolverResult<T> = Result<T, SolverError>;

fn max_abs_pa(imbalances: &BTreeMap<String, Pressure>) -> f64 {
    imbalances
        .values()
        .map(|p| p.value.abs())
        .fold(0.0, f64::max)
}
