//! The pipe network: graph, conduit models, fluid and design end points.

use std::collections::BTreeMap;

use hn_components::valve::valve_pressure_drop;
use hn_components::{Conduit, PipeFitting, PressureDropParts};
use hn_core::units::{Pressure, VolumeRate, m3ps, pa};
use hn_core::{ConduitId, NodeId};
use hn_fluids::{FluidModel, FluidState, PropertyPack};
use hn_graph::{FlowPath, Graph, PortKind};

use crate::error::{SolverError, SolverResult};

/// Which flow a design-point calculation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowBasis {
    /// The conduits' design flow rates.
    #[default]
    Design,
    /// The current flow estimates (after analysis).
    Current,
}

/// Pressure loss along one flow path, with the balancing-valve share split off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathLoss {
    pub without_balancing: Pressure,
    /// Balancing valves at their current preset.
    pub balancing: Pressure,
    /// Balancing valves fully open (`Kv = Kvs`).
    pub balancing_full_open: Pressure,
}

impl PathLoss {
    pub fn total(&self) -> Pressure {
        self.without_balancing + self.balancing
    }

    pub fn full_open_total(&self) -> Pressure {
        self.without_balancing + self.balancing_full_open
    }
}

/// How balancing valves count toward a path loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValvePosition {
    /// At their current preset.
    #[default]
    Preset,
    /// Fully open, as before balancing.
    FullyOpen,
}

impl ValvePosition {
    pub fn loss(self, loss: &PathLoss) -> Pressure {
        match self {
            ValvePosition::Preset => loss.total(),
            ValvePosition::FullyOpen => loss.full_open_total(),
        }
    }
}

/// A closed hydronic network ready for analysis.
///
/// Conduit models are indexed by the graph's `ConduitId`. Topology is fixed at
/// construction; flows and valve settings change through the methods below.
#[derive(Debug)]
pub struct PipeNetwork {
    name: String,
    graph: Graph,
    conduits: Vec<Conduit>,
    fluid: Box<dyn FluidModel>,
    fluid_state: FluidState,
    start_node: NodeId,
    end_node: NodeId,
}

impl PipeNetwork {
    pub fn new(
        name: impl Into<String>,
        graph: Graph,
        conduits: Vec<Conduit>,
        fluid: Box<dyn FluidModel>,
        fluid_state: FluidState,
        start_node: NodeId,
        end_node: NodeId,
    ) -> SolverResult<Self> {
        if conduits.len() != graph.conduits().len() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "graph has {} conduits but {} conduit models were given",
                    graph.conduits().len(),
                    conduits.len()
                ),
            });
        }
        for node in [start_node, end_node] {
            if graph.node(node).is_none() {
                return Err(SolverError::ProblemSetup {
                    what: format!("start/end node {} is not in the graph", node),
                });
            }
        }
        if start_node == end_node {
            return Err(SolverError::ProblemSetup {
                what: "start node and end node must differ".into(),
            });
        }

        let network = Self {
            name: name.into(),
            graph,
            conduits,
            fluid,
            fluid_state,
            start_node,
            end_node,
        };
        // fail early if the fluid cannot be evaluated at the given state
        network.properties()?;
        Ok(network)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn conduits(&self) -> &[Conduit] {
        &self.conduits
    }

    pub fn fluid(&self) -> &dyn FluidModel {
        self.fluid.as_ref()
    }

    pub fn fluid_state(&self) -> FluidState {
        self.fluid_state
    }

    pub fn start_node(&self) -> NodeId {
        self.start_node
    }

    pub fn end_node(&self) -> NodeId {
        self.end_node
    }

    /// Density and viscosity at the network's fluid state.
    pub fn properties(&self) -> SolverResult<PropertyPack> {
        Ok(self.fluid.property_pack(&self.fluid_state)?)
    }

    pub fn conduit(&self, id: ConduitId) -> &Conduit {
        &self.conduits[id.slot()]
    }

    pub fn conduit_id(&self, name: &str) -> SolverResult<ConduitId> {
        self.graph
            .conduit_by_name(name)
            .ok_or_else(|| SolverError::UnknownConduit { name: name.into() })
    }

    pub fn conduit_by_name(&self, name: &str) -> SolverResult<&Conduit> {
        Ok(self.conduit(self.conduit_id(name)?))
    }

    pub(crate) fn conduit_mut(&mut self, name: &str) -> SolverResult<&mut Conduit> {
        let id = self.conduit_id(name)?;
        Ok(&mut self.conduits[id.slot()])
    }

    pub(crate) fn conduit_at_mut(&mut self, id: ConduitId) -> &mut Conduit {
        &mut self.conduits[id.slot()]
    }

    pub(crate) fn store_flows(&mut self, flows: &[f64]) {
        for (conduit, &q) in self.conduits.iter_mut().zip(flows) {
            conduit.flow_rate = m3ps(q);
        }
    }

    // ---- fittings and valves ----

    pub fn add_fitting(&mut self, conduit: &str, zeta: f64, id: &str) -> SolverResult<()> {
        Ok(self.conduit_mut(conduit)?.add_fitting(zeta, id)?)
    }

    /// Evaluate a fitting model on `conduit` and attach it. Returns the
    /// coefficient.
    pub fn add_pipe_fitting(
        &mut self,
        conduit: &str,
        fitting: &PipeFitting,
        id: &str,
    ) -> SolverResult<f64> {
        let props = self.properties()?;
        Ok(self
            .conduit_mut(conduit)?
            .add_pipe_fitting(fitting, id, &props)?)
    }

    pub fn set_control_valve_opening(
        &mut self,
        conduit: &str,
        percent_open: f64,
    ) -> SolverResult<()> {
        Ok(self
            .conduit_mut(conduit)?
            .set_control_valve_opening(percent_open)?)
    }

    pub fn set_control_valve_kvs(&mut self, conduit: &str, kvs: f64) -> SolverResult<()> {
        Ok(self.conduit_mut(conduit)?.set_control_valve_kvs(kvs)?)
    }

    pub fn set_balancing_valve_kvs(&mut self, conduit: &str, kvs: f64) -> SolverResult<()> {
        Ok(self.conduit_mut(conduit)?.set_balancing_valve_kvs(kvs)?)
    }

    pub fn set_balancing_valve_kvr(&mut self, conduit: &str, kvr: f64) -> SolverResult<()> {
        Ok(self.conduit_mut(conduit)?.set_balancing_valve_kvr(kvr)?)
    }

    // ---- flows ----

    /// Start→end flow of a conduit on the chosen basis.
    pub fn physical_flow(&self, id: ConduitId, basis: FlowBasis) -> VolumeRate {
        let c = self.conduit(id);
        let q = match basis {
            FlowBasis::Design => c.design_flow_rate,
            FlowBasis::Current => c.flow_rate,
        };
        q * self.graph.orientation(id)
    }

    /// Net inflow minus outflow at every node, from the current flows.
    pub fn node_residuals(&self) -> BTreeMap<String, VolumeRate> {
        let mut residuals: BTreeMap<String, VolumeRate> = BTreeMap::new();
        for node in self.graph.nodes() {
            let mut sum = 0.0;
            for &port_id in self.graph.node_ports(node.id) {
                let Some(port) = self.graph.port(port_id) else {
                    continue;
                };
                let q = self.physical_flow(port.conduit, FlowBasis::Current).value;
                match port.kind {
                    PortKind::End => sum += q,
                    PortKind::Start => sum -= q,
                }
            }
            residuals.insert(node.name.clone(), m3ps(sum));
        }
        residuals
    }

    /// Volume flow entering the network at the start node, excluding pseudo
    /// conduits.
    pub fn inflow(&self, basis: FlowBasis) -> VolumeRate {
        let mut q = 0.0;
        for &port_id in self.graph.node_ports(self.start_node) {
            let Some(port) = self.graph.port(port_id) else {
                continue;
            };
            if self.conduit(port.conduit).is_pseudo() {
                continue;
            }
            let flow = self.physical_flow(port.conduit, basis).value;
            match port.kind {
                PortKind::Start => q += flow,
                PortKind::End => q -= flow,
            }
        }
        m3ps(q)
    }

    // ---- flow paths ----

    /// All flow paths from the start node to the end node, pseudo conduits
    /// excluded.
    pub fn flow_paths(&self) -> Vec<FlowPath> {
        self.graph.flow_paths(self.start_node, self.end_node, |id| {
            !self.conduits[id.slot()].is_pseudo()
        })
    }

    /// Pressure drop parts of one conduit in its start→end direction.
    pub fn conduit_parts(
        &self,
        id: ConduitId,
        basis: FlowBasis,
        props: &PropertyPack,
    ) -> SolverResult<PressureDropParts> {
        let q = self.physical_flow(id, basis);
        Ok(self.conduit(id).pressure_drop_parts(props, q)?)
    }

    pub fn path_loss(
        &self,
        path: &FlowPath,
        basis: FlowBasis,
        props: &PropertyPack,
    ) -> SolverResult<PathLoss> {
        let mut loss = PathLoss {
            without_balancing: pa(0.0),
            balancing: pa(0.0),
            balancing_full_open: pa(0.0),
        };
        for &id in &path.conduits {
            let parts = self.conduit_parts(id, basis, props)?;
            loss.without_balancing += parts.without_balancing_valve();
            loss.balancing += parts.balancing_valve;
            if let Some(valve) = self.conduit(id).balancing_valve() {
                let q = self.physical_flow(id, basis);
                loss.balancing_full_open +=
                    valve_pressure_drop(q, valve.kvs(), props.rho) * q.value.signum();
            }
        }
        Ok(loss)
    }

    /// The path with the largest loss and that loss, balancing valves at
    /// their preset. Before balancing this is the path the balancer treats as
    /// critical.
    pub fn critical_path(&self, basis: FlowBasis) -> SolverResult<Option<(FlowPath, Pressure)>> {
        self.heaviest_path(basis, ValvePosition::Preset)
    }

    /// The path with the largest loss and that loss. Ties keep the first path
    /// in flow-path order.
    pub fn heaviest_path(
        &self,
        basis: FlowBasis,
        valves: ValvePosition,
    ) -> SolverResult<Option<(FlowPath, Pressure)>> {
        let props = self.properties()?;
        let mut best: Option<(FlowPath, Pressure)> = None;
        for path in self.flow_paths() {
            let loss = valves.loss(&self.path_loss(&path, basis, &props)?);
            if best.as_ref().is_none_or(|(_, b)| loss > *b) {
                best = Some((path, loss));
            }
        }
        Ok(best)
    }
}
