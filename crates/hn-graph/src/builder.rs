//! Incremental graph builder.

use std::collections::HashMap;

use hn_core::{ConduitId, LoopId, NodeId, PortId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{ConduitEdge, Graph, Loop, LoopMember, LoopSense, Node, Port, PortKind};
use crate::validate;

/// Builder for constructing a graph incrementally.
///
/// Use `add_node`, `add_conduit` and `assign_loops`, then call `build()` to
/// validate and freeze the result into an immutable `Graph`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    conduits: Vec<ConduitEdge>,
    ports: Vec<Port>,
    loop_names: Vec<Vec<String>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph and return its ID.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a conduit running from `start` to `end`.
    ///
    /// Creates the two ports. The conduit belongs to no loop until
    /// [`assign_loops`](Self::assign_loops) is called.
    pub fn add_conduit(
        &mut self,
        name: impl Into<String>,
        start: NodeId,
        end: NodeId,
    ) -> ConduitId {
        let conduit_id = ConduitId::from_index(self.conduits.len() as u32);

        let start_port = PortId::from_index(self.ports.len() as u32);
        self.ports.push(Port {
            id: start_port,
            conduit: conduit_id,
            node: start,
            kind: PortKind::Start,
        });

        let end_port = PortId::from_index(self.ports.len() as u32);
        self.ports.push(Port {
            id: end_port,
            conduit: conduit_id,
            node: end,
            kind: PortKind::End,
        });

        self.conduits.push(ConduitEdge {
            id: conduit_id,
            name: name.into(),
            ports: [start_port, end_port],
            loops: Vec::new(),
            sense: LoopSense::Clockwise,
        });
        self.loop_names.push(Vec::new());

        conduit_id
    }

    /// Place a conduit in one or two loops.
    ///
    /// `sense` is the orientation of the conduit's start→end direction in the
    /// first listed loop; in the second loop the conduit is traversed the
    /// other way round.
    pub fn assign_loops(
        &mut self,
        conduit: ConduitId,
        loops: &[&str],
        sense: LoopSense,
    ) -> GraphResult<()> {
        let edge = self
            .conduits
            .get_mut(conduit.slot())
            .ok_or(GraphError::UnknownConduit { conduit })?;

        if loops.len() > 2 {
            return Err(GraphError::TooManyLoops {
                conduit: edge.name.clone(),
                count: loops.len(),
            });
        }
        if loops.len() == 2 && loops[0] == loops[1] {
            return Err(GraphError::RepeatedLoop {
                conduit: edge.name.clone(),
                loop_name: loops[0].to_string(),
            });
        }

        edge.sense = sense;
        self.loop_names[conduit.slot()] = loops.iter().map(|s| s.to_string()).collect();
        Ok(())
    }

    /// Build and validate the graph.
    pub fn build(mut self) -> GraphResult<Graph> {
        validate::validate_names(&self.nodes, &self.conduits)?;
        validate::validate_structure(&self.nodes, &self.conduits, &self.ports)?;

        let loops = self.collect_loops();

        let (node_port_offsets, node_ports) = Self::build_adjacency(&self.nodes, &self.ports);
        validate::validate_adjacency(&self.nodes, &self.ports, &node_port_offsets, &node_ports)?;

        let graph = Graph {
            nodes: self.nodes,
            conduits: self.conduits,
            ports: self.ports,
            loops,
            node_port_offsets,
            node_ports,
        };
        validate::validate_loops(&graph)?;
        Ok(graph)
    }

    /// Turn per-conduit loop names into `Loop` records.
    ///
    /// Loop ids follow the order in which loop names first appear while
    /// walking conduits in id order.
    fn collect_loops(&mut self) -> Vec<Loop> {
        let mut by_name: HashMap<String, LoopId> = HashMap::new();
        let mut loops: Vec<Loop> = Vec::new();

        for (edge, names) in self.conduits.iter_mut().zip(&self.loop_names) {
            for (position, name) in names.iter().enumerate() {
                let loop_id = *by_name.entry(name.clone()).or_insert_with(|| {
                    let id = LoopId::from_index(loops.len() as u32);
                    loops.push(Loop {
                        id,
                        name: name.clone(),
                        members: Vec::new(),
                    });
                    id
                });
                let sign = if position == 0 { 1.0 } else { -1.0 };
                loops[loop_id.slot()].members.push(LoopMember {
                    conduit: edge.id,
                    sign,
                });
                edge.loops.push(loop_id);
            }
        }

        loops
    }

    /// Build compact adjacency lists: for each node, collect its incident ports.
    fn build_adjacency(nodes: &[Node], ports: &[Port]) -> (Vec<usize>, Vec<PortId>) {
        let mut node_to_ports: HashMap<NodeId, Vec<PortId>> = HashMap::new();
        for port in ports {
            node_to_ports.entry(port.node).or_default().push(port.id);
        }

        for ports_list in node_to_ports.values_mut() {
            ports_list.sort_by_key(|p| p.index());
        }

        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        let mut flat_ports = Vec::new();
        offsets.push(0);

        for node in nodes {
            if let Some(ports_list) = node_to_ports.get(&node.id) {
                flat_ports.extend_from_slice(ports_list);
            }
            offsets.push(flat_ports.len());
        }

        (offsets, flat_ports)
    }
}
