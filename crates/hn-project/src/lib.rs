//! hn-project: network definition files, validation and conversion.

pub mod convert;
pub mod schema;
pub mod validate;

use std::path::Path;

pub use convert::{build_network, network_to_def};
pub use schema::*;
pub use validate::{ValidationError, validate_network};

use tracing::debug;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Solver error: {0}")]
    Solver(#[from] hn_solver::SolverError),

    #[error("Graph error: {0}")]
    Graph(#[from] hn_graph::GraphError),

    #[error("Component error: {0}")]
    Component(#[from] hn_components::ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] hn_fluids::FluidError),
}

pub fn load_yaml(path: &Path) -> ProjectResult<NetworkDef> {
    let content = std::fs::read_to_string(path)?;
    let def: NetworkDef = serde_yaml::from_str(&content)?;
    validate_network(&def)?;
    debug!(path = %path.display(), network = %def.name, "loaded YAML network");
    Ok(def)
}

pub fn save_yaml(path: &Path, def: &NetworkDef) -> ProjectResult<()> {
    validate_network(def)?;
    let content = serde_yaml::to_string(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<NetworkDef> {
    let content = std::fs::read_to_string(path)?;
    let def: NetworkDef = serde_json::from_str(&content)?;
    validate_network(&def)?;
    debug!(path = %path.display(), network = %def.name, "loaded JSON network");
    Ok(def)
}

pub fn save_json(path: &Path, def: &NetworkDef) -> ProjectResult<()> {
    validate_network(def)?;
    let content = serde_json::to_string_pretty(def)?;
    std::fs::write(path, content)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load JSON for a `.json` extension, YAML otherwise.
pub fn load(path: &Path) -> ProjectResult<NetworkDef> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

/// Save JSON for a `.json` extension, YAML otherwise.
pub fn save(path: &Path, def: &NetworkDef) -> ProjectResult<()> {
    if is_json(path) {
        save_json(path, def)
    } else {
        save_yaml(path, def)
    }
}
