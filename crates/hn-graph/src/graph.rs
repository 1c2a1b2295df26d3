//! Core graph data structures.

use hn_core::{ConduitId, LoopId, NodeId, PortId};

/// Which end of a conduit a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Start node side (design flow leaves the node here).
    Start,
    /// End node side (design flow arrives at the node here).
    End,
}

/// Orientation of a conduit's start→end direction within its first loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopSense {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl LoopSense {
    /// `+1.0` for clockwise, `-1.0` for counter-clockwise.
    pub fn factor(self) -> f64 {
        match self {
            LoopSense::Clockwise => 1.0,
            LoopSense::CounterClockwise => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            LoopSense::Clockwise => LoopSense::CounterClockwise,
            LoopSense::CounterClockwise => LoopSense::Clockwise,
        }
    }

    /// Tabular design data lists conduits with their start node upstream and a
    /// flow sign relative to the first loop; a negative design flow therefore
    /// means start→end runs against the loop.
    pub fn from_design_flow(flow: f64) -> Self {
        if flow < 0.0 {
            LoopSense::CounterClockwise
        } else {
            LoopSense::Clockwise
        }
    }
}

/// A junction in the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

/// A port connects a conduit end to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub id: PortId,
    pub conduit: ConduitId,
    pub node: NodeId,
    pub kind: PortKind,
}

/// Topology of one pipe, duct or pseudo conduit.
#[derive(Debug, Clone, PartialEq)]
pub struct ConduitEdge {
    pub id: ConduitId,
    pub name: String,
    /// Exactly 2 ports: [start_port_id, end_port_id].
    pub ports: [PortId; 2],
    /// Loops this conduit belongs to; the first entry defines the flow sign.
    pub loops: Vec<LoopId>,
    /// Orientation of start→end in the first loop.
    pub sense: LoopSense,
}

impl ConduitEdge {
    pub fn start_port(&self) -> PortId {
        self.ports[0]
    }

    pub fn end_port(&self) -> PortId {
        self.ports[1]
    }

    /// Sign of this conduit in `loop_id`: `+1` in its first loop, `-1` in its second.
    pub fn sign_in(&self, loop_id: LoopId) -> Option<f64> {
        match self.loops.iter().position(|&l| l == loop_id) {
            Some(0) => Some(1.0),
            Some(_) => Some(-1.0),
            None => None,
        }
    }
}

/// One conduit of a loop together with its sign in that loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopMember {
    pub conduit: ConduitId,
    pub sign: f64,
}

/// A closed cycle of conduits with clockwise positive sense.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub id: LoopId,
    pub name: String,
    pub members: Vec<LoopMember>,
}

/// The graph: a validated, immutable collection of nodes, conduits, ports and loops.
///
/// Node→port adjacency is stored in compressed form (offsets + flat list),
/// sorted by port id so traversal order follows conduit creation order.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) conduits: Vec<ConduitEdge>,
    pub(crate) ports: Vec<Port>,
    pub(crate) loops: Vec<Loop>,

    /// Node i's ports are in node_ports[node_port_offsets[i]..node_port_offsets[i+1]].
    pub(crate) node_port_offsets: Vec<usize>,
    pub(crate) node_ports: Vec<PortId>,
}

impl Graph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn conduits(&self) -> &[ConduitEdge] {
        &self.conduits
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Loops in id order.
    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.slot())
    }

    pub fn conduit(&self, id: ConduitId) -> Option<&ConduitEdge> {
        self.conduits.get(id.slot())
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.slot())
    }

    pub fn loop_by_id(&self, id: LoopId) -> Option<&Loop> {
        self.loops.get(id.slot())
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    pub fn conduit_by_name(&self, name: &str) -> Option<ConduitId> {
        self.conduits.iter().find(|c| c.name == name).map(|c| c.id)
    }

    pub fn loop_by_name(&self, name: &str) -> Option<LoopId> {
        self.loops.iter().find(|l| l.name == name).map(|l| l.id)
    }

    /// Port IDs incident to a node.
    pub fn node_ports(&self, node_id: NodeId) -> &[PortId] {
        let idx = node_id.slot();
        if idx >= self.nodes.len() {
            return &[];
        }
        let start = self.node_port_offsets[idx];
        let end = self.node_port_offsets[idx + 1];
        &self.node_ports[start..end]
    }

    pub fn start_node(&self, conduit: ConduitId) -> Option<NodeId> {
        let edge = self.conduit(conduit)?;
        Some(self.port(edge.start_port())?.node)
    }

    pub fn end_node(&self, conduit: ConduitId) -> Option<NodeId> {
        let edge = self.conduit(conduit)?;
        Some(self.port(edge.end_port())?.node)
    }

    /// Factor that turns a first-loop-relative flow into a start→end flow.
    pub fn orientation(&self, conduit: ConduitId) -> f64 {
        self.conduit(conduit).map_or(1.0, |c| c.sense.factor())
    }

    pub fn node_name(&self, id: NodeId) -> &str {
        self.node(id).map_or("?", |n| n.name.as_str())
    }

    pub fn conduit_name(&self, id: ConduitId) -> &str {
        self.conduit(id).map_or("?", |c| c.name.as_str())
    }
}
