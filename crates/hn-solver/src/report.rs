//! Read-only tables and derived quantities of a network.

use hn_components::ConduitKind;
use hn_components::valve::valve_pressure_drop;
use hn_core::units::{Pressure, VolumeRate, m3ps, pa};

use crate::error::SolverResult;
use crate::network::{FlowBasis, PipeNetwork};

#[derive(Debug, Clone, PartialEq)]
pub struct ConduitRow {
    pub name: String,
    pub kind: ConduitKind,
    pub start_node: String,
    pub end_node: String,
    /// Start→end flow.
    pub flow: VolumeRate,
    pub velocity: f64,
    pub reynolds: f64,
    pub zeta_total: f64,
    pub friction: Pressure,
    pub fittings: Pressure,
    pub valves: Pressure,
    pub total: Pressure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittingRow {
    pub conduit: String,
    pub id: String,
    pub zeta: f64,
    pub pressure_drop: Pressure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowPathRow {
    pub path: String,
    /// Elevation (stack) part; zero in a closed network.
    pub dp_static: Pressure,
    pub dp_dynamic: Pressure,
    pub dp_total: Pressure,
    /// Shortfall against the critical path.
    pub dp_deficit: Pressure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalancingValveRow {
    pub conduit: String,
    pub kvs: f64,
    pub kvr: Option<f64>,
    pub pressure_drop: Pressure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlValveRow {
    pub conduit: String,
    pub kvs: f64,
    pub opening_pct: f64,
    pub kv: f64,
    pub pressure_drop: Pressure,
    /// Fully open valve drop over the critical path loss at design flow.
    pub authority: f64,
}

/// Conduits at their current flows.
pub fn conduit_table(network: &PipeNetwork) -> SolverResult<Vec<ConduitRow>> {
    let props = network.properties()?;
    let graph = network.graph();
    let mut rows = Vec::with_capacity(graph.conduits().len());
    for edge in graph.conduits() {
        let c = network.conduit(edge.id);
        let flow = network.physical_flow(edge.id, FlowBasis::Current);
        let parts = c.pressure_drop_parts(&props, flow)?;
        rows.push(ConduitRow {
            name: edge.name.clone(),
            kind: c.kind(),
            start_node: node_name(network, graph.start_node(edge.id)),
            end_node: node_name(network, graph.end_node(edge.id)),
            flow,
            velocity: c.velocity(flow).value,
            reynolds: c.reynolds(&props, flow),
            zeta_total: c.zeta_total(),
            friction: parts.friction,
            fittings: parts.fittings,
            valves: parts.control_valve + parts.balancing_valve,
            total: parts.total(),
        });
    }
    Ok(rows)
}

fn node_name(network: &PipeNetwork, node: Option<hn_core::NodeId>) -> String {
    node.map_or_else(String::new, |n| network.graph().node_name(n).to_string())
}

/// Every attached fitting and its pressure drop at the conduit's current flow.
pub fn fitting_table(network: &PipeNetwork) -> SolverResult<Vec<FittingRow>> {
    let props = network.properties()?;
    let mut rows = Vec::new();
    for edge in network.graph().conduits() {
        let c = network.conduit(edge.id);
        let flow = network.physical_flow(edge.id, FlowBasis::Current);
        let pv = flow.value.signum() * c.velocity_pressure(&props, flow).value;
        for fitting in c.fittings().iter() {
            rows.push(FittingRow {
                conduit: edge.name.clone(),
                id: fitting.id.clone(),
                zeta: fitting.zeta,
                pressure_drop: pa(fitting.zeta * pv),
            });
        }
    }
    Ok(rows)
}

/// Loss along every start→end flow path.
pub fn flow_path_table(
    network: &PipeNetwork,
    basis: FlowBasis,
) -> SolverResult<Vec<FlowPathRow>> {
    let props = network.properties()?;
    let mut rows = Vec::new();
    for path in network.flow_paths() {
        let dynamic = network.path_loss(&path, basis, &props)?.total();
        rows.push(FlowPathRow {
            path: path.label(network.graph()),
            dp_static: pa(0.0),
            dp_dynamic: dynamic,
            dp_total: dynamic,
            dp_deficit: pa(0.0),
        });
    }
    let worst = rows
        .iter()
        .map(|r| r.dp_total.value)
        .fold(f64::NEG_INFINITY, f64::max);
    for row in &mut rows {
        row.dp_deficit = pa(worst - row.dp_total.value);
    }
    Ok(rows)
}

/// Balancing valves at design flow.
pub fn balancing_valve_table(network: &PipeNetwork) -> SolverResult<Vec<BalancingValveRow>> {
    let props = network.properties()?;
    let mut rows = Vec::new();
    for edge in network.graph().conduits() {
        let c = network.conduit(edge.id);
        let Some(valve) = c.balancing_valve() else {
            continue;
        };
        rows.push(BalancingValveRow {
            conduit: edge.name.clone(),
            kvs: valve.kvs(),
            kvr: valve.kvr(),
            pressure_drop: valve_pressure_drop(c.design_flow_rate, valve.kv(), props.rho),
        });
    }
    Ok(rows)
}

/// Control valves at design flow, with their authority.
pub fn control_valve_table(network: &PipeNetwork) -> SolverResult<Vec<ControlValveRow>> {
    let props = network.properties()?;
    let critical = network
        .critical_path(FlowBasis::Design)?
        .map_or(0.0, |(_, loss)| loss.value);
    let mut rows = Vec::new();
    for edge in network.graph().conduits() {
        let c = network.conduit(edge.id);
        let Some(valve) = c.control_valve() else {
            continue;
        };
        let full_open = valve_pressure_drop(c.design_flow_rate, valve.kvs(), props.rho);
        let authority = if critical > 0.0 {
            full_open.value / critical
        } else {
            0.0
        };
        rows.push(ControlValveRow {
            conduit: edge.name.clone(),
            kvs: valve.kvs(),
            opening_pct: valve.opening(),
            kv: valve.kv(),
            pressure_drop: valve_pressure_drop(c.design_flow_rate, valve.kv(), props.rho),
            authority,
        });
    }
    Ok(rows)
}

/// `ΔP_crit / Q_in²` [Pa·s²/m⁶] with the valves as they are set.
///
/// On `FlowBasis::Current` after a converged analysis this is the resistance
/// the source works against, so `R·Q_in²` equals its pressure rise.
pub fn hydraulic_resistance(network: &PipeNetwork, basis: FlowBasis) -> SolverResult<f64> {
    let q = network.inflow(basis).value;
    if q.abs() < hn_components::common::EPSILON_FLOW {
        return Ok(0.0);
    }
    let dp = network
        .critical_path(basis)?
        .map_or(0.0, |(_, loss)| loss.value);
    Ok(dp / (q * q))
}

/// `ΔP = R·Q²` of a network with fixed valve settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemCurve {
    pub resistance: f64,
}

impl SystemCurve {
    pub fn of(network: &PipeNetwork, basis: FlowBasis) -> SolverResult<Self> {
        Ok(Self {
            resistance: hydraulic_resistance(network, basis)?,
        })
    }

    pub fn pressure(&self, flow: VolumeRate) -> Pressure {
        pa(self.resistance * flow.value * flow.value)
    }

    /// `n + 1` evenly spaced points from zero to `q_max`.
    pub fn points(&self, q_max: VolumeRate, n: usize) -> Vec<(VolumeRate, Pressure)> {
        let n = n.max(1);
        (0..=n)
            .map(|i| {
                let q = m3ps(q_max.value * i as f64 / n as f64);
                (q, self.pressure(q))
            })
            .collect()
    }
}
