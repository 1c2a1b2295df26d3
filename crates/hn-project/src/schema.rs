//! Network definition file schema.
//!
//! All quantities are plain SI numbers; the field suffix names the unit.
//! Flow rates are loop-relative: positive along the conduit's orientation in
//! its first loop.

use serde::{Deserialize, Serialize};

/// Current schema version written by [`save_yaml`](crate::save_yaml) and
/// [`save_json`](crate::save_json).
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkDef {
    pub version: u32,
    pub name: String,
    pub fluid: FluidDef,
    pub fluid_state: FluidStateDef,
    pub start_node: String,
    pub end_node: String,
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub conduits: Vec<ConduitDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FluidDef {
    Water,
    DryAir,
    Constant { rho_kg_m3: f64, mu_pa_s: f64 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FluidStateDef {
    pub pressure_pa: f64,
    pub temperature_k: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoopSenseDef {
    Clockwise,
    CounterClockwise,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConduitDef {
    pub id: String,
    pub start_node: String,
    pub end_node: String,
    /// One or two loop names; the first one defines the flow sign.
    pub loops: Vec<String>,
    /// Orientation of start→end in the first loop. When absent it follows the
    /// sign of the design flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_sense: Option<LoopSenseDef>,
    pub kind: ConduitKindDef,
    pub design_flow_m3s: f64,
    /// Last solved flow; defaults to the design flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_m3s: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fittings: Vec<FittingDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balancing_valve: Option<BalancingValveDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_valve: Option<ControlValveDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ConduitKindDef {
    Pipe {
        length_m: f64,
        section: SectionDef,
        roughness_m: f64,
    },
    Pseudo {
        fixed_pressure_drop_pa: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape")]
pub enum SectionDef {
    Circular { diameter_m: f64 },
    Rectangular { width_m: f64, height_m: f64 },
    FlatOval { major_m: f64, minor_m: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittingDef {
    pub id: String,
    pub zeta: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BalancingValveDef {
    pub kvs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kvr: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ControlValveDef {
    pub kvs: f64,
    #[serde(default = "default_opening_pct")]
    pub opening_pct: f64,
    #[serde(default)]
    pub characteristic: CharacteristicDef,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CharacteristicDef {
    #[default]
    Linear,
    Quadratic,
    EqualPercentage {
        rangeability: f64,
    },
}

fn default_opening_pct() -> f64 {
    100.0
}
