//! Conversion between [`NetworkDef`] and a solvable [`PipeNetwork`].

use std::collections::HashMap;

use hn_components::{
    BalancingValve, Conduit, ConduitMode, ControlValve, CrossSection, PipeGeometry,
    ValveCharacteristic,
};
use hn_core::NodeId;
use hn_core::units::{k, m, m3ps, pa};
use hn_fluids::{FluidKind, FluidState};
use hn_graph::{GraphBuilder, LoopSense};
use hn_solver::PipeNetwork;
use tracing::debug;

use crate::schema::*;
use crate::validate::{ValidationError, validate_network};
use crate::{ProjectError, ProjectResult};

/// Validate `def` and build the network it describes.
pub fn build_network(def: &NetworkDef) -> ProjectResult<PipeNetwork> {
    validate_network(def)?;

    let mut builder = GraphBuilder::new();
    let nodes: HashMap<&str, NodeId> = def
        .nodes
        .iter()
        .map(|name| (name.as_str(), builder.add_node(name.as_str())))
        .collect();
    let node = |name: &str, context: &str| -> ProjectResult<NodeId> {
        nodes.get(name).copied().ok_or_else(|| {
            ProjectError::Validation(ValidationError::MissingReference {
                id: name.to_string(),
                context: context.to_string(),
            })
        })
    };

    let mut conduits = Vec::with_capacity(def.conduits.len());
    for c in &def.conduits {
        let id = builder.add_conduit(
            c.id.as_str(),
            node(&c.start_node, &c.id)?,
            node(&c.end_node, &c.id)?,
        );
        let loops: Vec<&str> = c.loops.iter().map(String::as_str).collect();
        let sense = c
            .loop_sense
            .map_or_else(|| LoopSense::from_design_flow(c.design_flow_m3s), Into::into);
        builder.assign_loops(id, &loops, sense)?;
        conduits.push(conduit_from_def(c)?);
    }
    let graph = builder.build()?;

    let fluid = FluidKind::from(def.fluid).model()?;
    let state = FluidState::new(
        pa(def.fluid_state.pressure_pa),
        k(def.fluid_state.temperature_k),
    )?;
    let network = PipeNetwork::new(
        def.name.clone(),
        graph,
        conduits,
        fluid,
        state,
        node(&def.start_node, "start_node")?,
        node(&def.end_node, "end_node")?,
    )?;
    debug!(
        network = %def.name,
        conduits = def.conduits.len(),
        loops = network.graph().loops().len(),
        "network built"
    );
    Ok(network)
}

fn conduit_from_def(c: &ConduitDef) -> ProjectResult<Conduit> {
    let design = m3ps(c.design_flow_m3s);
    let mut conduit = match c.kind {
        ConduitKindDef::Pipe {
            length_m,
            section,
            roughness_m,
        } => {
            let geometry = PipeGeometry::new(m(length_m), section.into(), m(roughness_m))?;
            Conduit::pipe(geometry, design)
        }
        ConduitKindDef::Pseudo {
            fixed_pressure_drop_pa,
        } => Conduit::pseudo(pa(fixed_pressure_drop_pa), design),
    };
    conduit.flow_rate = m3ps(c.flow_m3s.unwrap_or(c.design_flow_m3s));

    for fitting in &c.fittings {
        conduit.add_fitting(fitting.zeta, fitting.id.as_str())?;
    }
    if let Some(def) = c.balancing_valve {
        let mut valve = BalancingValve::new(def.kvs)?;
        if let Some(kvr) = def.kvr {
            valve.set_kvr(kvr)?;
        }
        conduit.attach_balancing_valve(valve)?;
    }
    if let Some(def) = c.control_valve {
        let characteristic = match def.characteristic {
            CharacteristicDef::Linear => ValveCharacteristic::Linear,
            CharacteristicDef::Quadratic => ValveCharacteristic::Quadratic,
            CharacteristicDef::EqualPercentage { rangeability } => {
                ValveCharacteristic::equal_percentage(rangeability)?
            }
        };
        let mut valve = ControlValve::new(def.kvs)?.with_characteristic(characteristic);
        valve.set_opening(def.opening_pct)?;
        conduit.attach_control_valve(valve)?;
    }
    Ok(conduit)
}

/// Capture topology, loop senses, flows, fittings and valve settings.
pub fn network_to_def(network: &PipeNetwork) -> NetworkDef {
    let graph = network.graph();
    let node_name = |id: Option<NodeId>| id.map_or_else(String::new, |n| graph.node_name(n).into());

    let conduits = graph
        .conduits()
        .iter()
        .map(|edge| {
            let c = network.conduit(edge.id);
            ConduitDef {
                id: edge.name.clone(),
                start_node: node_name(graph.start_node(edge.id)),
                end_node: node_name(graph.end_node(edge.id)),
                loops: edge
                    .loops
                    .iter()
                    .filter_map(|&l| graph.loop_by_id(l))
                    .map(|l| l.name.clone())
                    .collect(),
                loop_sense: Some(edge.sense.into()),
                kind: match c.mode() {
                    ConduitMode::Pipe(g) => ConduitKindDef::Pipe {
                        length_m: g.length.value,
                        section: g.cross_section.into(),
                        roughness_m: g.roughness.value,
                    },
                    ConduitMode::Pseudo {
                        fixed_pressure_drop,
                    } => ConduitKindDef::Pseudo {
                        fixed_pressure_drop_pa: fixed_pressure_drop.value,
                    },
                },
                design_flow_m3s: c.design_flow_rate.value,
                flow_m3s: Some(c.flow_rate.value),
                fittings: c
                    .fittings()
                    .iter()
                    .map(|f| FittingDef {
                        id: f.id.clone(),
                        zeta: f.zeta,
                    })
                    .collect(),
                balancing_valve: c.balancing_valve().map(|v| BalancingValveDef {
                    kvs: v.kvs(),
                    kvr: v.kvr(),
                }),
                control_valve: c.control_valve().map(|v| ControlValveDef {
                    kvs: v.kvs(),
                    opening_pct: v.opening(),
                    characteristic: v.characteristic.into(),
                }),
            }
        })
        .collect();

    let state = network.fluid_state();
    NetworkDef {
        version: SCHEMA_VERSION,
        name: network.name().to_string(),
        fluid: network.fluid().kind().into(),
        fluid_state: FluidStateDef {
            pressure_pa: state.pressure().value,
            temperature_k: state.temperature().value,
        },
        start_node: graph.node_name(network.start_node()).to_string(),
        end_node: graph.node_name(network.end_node()).to_string(),
        nodes: graph.nodes().iter().map(|n| n.name.clone()).collect(),
        conduits,
    }
}

impl From<LoopSenseDef> for LoopSense {
    fn from(def: LoopSenseDef) -> Self {
        match def {
            LoopSenseDef::Clockwise => LoopSense::Clockwise,
            LoopSenseDef::CounterClockwise => LoopSense::CounterClockwise,
        }
    }
}

impl From<LoopSense> for LoopSenseDef {
    fn from(sense: LoopSense) -> Self {
        match sense {
            LoopSense::Clockwise => LoopSenseDef::Clockwise,
            LoopSense::CounterClockwise => LoopSenseDef::CounterClockwise,
        }
    }
}

impl From<FluidDef> for FluidKind {
    fn from(def: FluidDef) -> Self {
        match def {
            FluidDef::Water => FluidKind::Water,
            FluidDef::DryAir => FluidKind::DryAir,
            FluidDef::Constant { rho_kg_m3, mu_pa_s } => FluidKind::Constant {
                rho: rho_kg_m3,
                mu: mu_pa_s,
            },
        }
    }
}

impl From<FluidKind> for FluidDef {
    fn from(kind: FluidKind) -> Self {
        match kind {
            FluidKind::Water => FluidDef::Water,
            FluidKind::DryAir => FluidDef::DryAir,
            FluidKind::Constant { rho, mu } => FluidDef::Constant {
                rho_kg_m3: rho,
                mu_pa_s: mu,
            },
        }
    }
}

impl From<SectionDef> for CrossSection {
    fn from(def: SectionDef) -> Self {
        match def {
            SectionDef::Circular { diameter_m } => CrossSection::circular(m(diameter_m)),
            SectionDef::Rectangular { width_m, height_m } => {
                CrossSection::rectangular(m(width_m), m(height_m))
            }
            SectionDef::FlatOval { major_m, minor_m } => {
                CrossSection::flat_oval(m(major_m), m(minor_m))
            }
        }
    }
}

impl From<CrossSection> for SectionDef {
    fn from(section: CrossSection) -> Self {
        match section {
            CrossSection::Circular { diameter } => SectionDef::Circular {
                diameter_m: diameter.value,
            },
            CrossSection::Rectangular { width, height } => SectionDef::Rectangular {
                width_m: width.value,
                height_m: height.value,
            },
            CrossSection::FlatOval { major, minor } => SectionDef::FlatOval {
                major_m: major.value,
                minor_m: minor.value,
            },
        }
    }
}

impl From<ValveCharacteristic> for CharacteristicDef {
    fn from(c: ValveCharacteristic) -> Self {
        match c {
            ValveCharacteristic::Linear => CharacteristicDef::Linear,
            ValveCharacteristic::Quadratic => CharacteristicDef::Quadratic,
            ValveCharacteristic::EqualPercentage { rangeability } => {
                CharacteristicDef::EqualPercentage { rangeability }
            }
        }
    }
}
