//! Definition validation, independent of graph construction.

use std::collections::HashSet;

use crate::schema::{ConduitDef, ConduitKindDef, NetworkDef, SCHEMA_VERSION, SectionDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_network(def: &NetworkDef) -> Result<(), ValidationError> {
    if def.version == 0 || def.version > SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: def.version,
        });
    }

    let mut node_ids = HashSet::new();
    for node in &def.nodes {
        if !node_ids.insert(node.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.clone(),
                context: "nodes".to_string(),
            });
        }
    }
    for (node, context) in [(&def.start_node, "start_node"), (&def.end_node, "end_node")] {
        if !node_ids.contains(node.as_str()) {
            return Err(ValidationError::MissingReference {
                id: node.clone(),
                context: context.to_string(),
            });
        }
    }
    if def.start_node == def.end_node {
        return Err(invalid(
            "end_node",
            &def.end_node,
            "must differ from start_node",
        ));
    }

    positive("fluid_state.pressure_pa", def.fluid_state.pressure_pa)?;
    positive("fluid_state.temperature_k", def.fluid_state.temperature_k)?;

    let mut conduit_ids = HashSet::new();
    for conduit in &def.conduits {
        if !conduit_ids.insert(conduit.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: conduit.id.clone(),
                context: "conduits".to_string(),
            });
        }
        validate_conduit(conduit, &node_ids)?;
    }
    Ok(())
}

fn validate_conduit(c: &ConduitDef, node_ids: &HashSet<&str>) -> Result<(), ValidationError> {
    for node in [&c.start_node, &c.end_node] {
        if !node_ids.contains(node.as_str()) {
            return Err(ValidationError::MissingReference {
                id: node.clone(),
                context: format!("conduit {}", c.id),
            });
        }
    }
    if c.loops.is_empty() || c.loops.len() > 2 {
        return Err(invalid(
            &format!("{}.loops", c.id),
            &c.loops.len(),
            "a conduit belongs to one or two loops",
        ));
    }
    finite(&format!("{}.design_flow_m3s", c.id), c.design_flow_m3s)?;
    if let Some(q) = c.flow_m3s {
        finite(&format!("{}.flow_m3s", c.id), q)?;
    }

    match c.kind {
        ConduitKindDef::Pipe {
            length_m,
            section,
            roughness_m,
        } => {
            positive(&format!("{}.length_m", c.id), length_m)?;
            if !(roughness_m.is_finite() && roughness_m >= 0.0) {
                return Err(invalid(
                    &format!("{}.roughness_m", c.id),
                    &roughness_m,
                    "must be finite and non-negative",
                ));
            }
            match section {
                SectionDef::Circular { diameter_m } => {
                    positive(&format!("{}.diameter_m", c.id), diameter_m)?;
                }
                SectionDef::Rectangular { width_m, height_m } => {
                    positive(&format!("{}.width_m", c.id), width_m)?;
                    positive(&format!("{}.height_m", c.id), height_m)?;
                }
                SectionDef::FlatOval { major_m, minor_m } => {
                    positive(&format!("{}.minor_m", c.id), minor_m)?;
                    if !(major_m.is_finite() && major_m >= minor_m) {
                        return Err(invalid(
                            &format!("{}.major_m", c.id),
                            &major_m,
                            "must not be smaller than minor_m",
                        ));
                    }
                }
            }
        }
        ConduitKindDef::Pseudo {
            fixed_pressure_drop_pa,
        } => {
            finite(&format!("{}.fixed_pressure_drop_pa", c.id), fixed_pressure_drop_pa)?;
            if !c.fittings.is_empty() || c.balancing_valve.is_some() || c.control_valve.is_some()
            {
                return Err(invalid(
                    &format!("{}.kind", c.id),
                    &"Pseudo",
                    "a pseudo conduit carries no fittings or valves",
                ));
            }
        }
    }

    let mut fitting_ids = HashSet::new();
    for fitting in &c.fittings {
        if !fitting_ids.insert(fitting.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: fitting.id.clone(),
                context: format!("fittings of conduit {}", c.id),
            });
        }
    }

    if let Some(bv) = c.balancing_valve {
        positive(&format!("{}.balancing_valve.kvs", c.id), bv.kvs)?;
        if let Some(kvr) = bv.kvr {
            positive(&format!("{}.balancing_valve.kvr", c.id), kvr)?;
            if kvr > bv.kvs {
                return Err(invalid(
                    &format!("{}.balancing_valve.kvr", c.id),
                    &kvr,
                    "must not exceed kvs",
                ));
            }
        }
    }
    if let Some(cv) = c.control_valve {
        positive(&format!("{}.control_valve.kvs", c.id), cv.kvs)?;
        if !(0.0..=100.0).contains(&cv.opening_pct) {
            return Err(invalid(
                &format!("{}.control_valve.opening_pct", c.id),
                &cv.opening_pct,
                "must lie in 0..=100",
            ));
        }
    }
    Ok(())
}

fn invalid(field: &str, value: &dyn std::fmt::Display, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &value, "must be finite and positive"))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &value, "must be finite"))
    }
}
