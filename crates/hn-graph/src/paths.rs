//! Flow-path enumeration.

use hn_core::{ConduitId, NodeId};

use crate::graph::{Graph, PortKind};

/// A sequence of conduits leading from one node to another, each traversed
/// start→end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowPath {
    pub conduits: Vec<ConduitId>,
}

impl FlowPath {
    pub fn contains(&self, conduit: ConduitId) -> bool {
        self.conduits.contains(&conduit)
    }

    /// Conduit names joined with `-`, e.g. `P1-P5-P12`.
    pub fn label(&self, graph: &Graph) -> String {
        self.conduits
            .iter()
            .map(|&c| graph.conduit_name(c))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl Graph {
    /// All simple paths from `from` to `to` that follow conduits in their
    /// start→end direction, skipping conduits for which `include` is false.
    ///
    /// Paths come out in depth-first order over conduit ids, so the result is
    /// the same for the same graph.
    pub fn flow_paths<F>(&self, from: NodeId, to: NodeId, include: F) -> Vec<FlowPath>
    where
        F: Fn(ConduitId) -> bool,
    {
        let mut paths = Vec::new();
        if self.node(from).is_none() || self.node(to).is_none() || from == to {
            return paths;
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut trail = Vec::new();
        visited[from.slot()] = true;
        self.walk(from, to, &include, &mut visited, &mut trail, &mut paths);
        paths
    }

    fn walk<F>(
        &self,
        at: NodeId,
        to: NodeId,
        include: &F,
        visited: &mut [bool],
        trail: &mut Vec<ConduitId>,
        paths: &mut Vec<FlowPath>,
    ) where
        F: Fn(ConduitId) -> bool,
    {
        for &port_id in self.node_ports(at) {
            let port = &self.ports[port_id.slot()];
            if port.kind != PortKind::Start || !include(port.conduit) {
                continue;
            }
            let Some(next) = self.end_node(port.conduit) else {
                continue;
            };
            if visited[next.slot()] {
                continue;
            }

            trail.push(port.conduit);
            if next == to {
                paths.push(FlowPath {
                    conduits: trail.clone(),
                });
            } else {
                visited[next.slot()] = true;
                self.walk(next, to, include, visited, trail, paths);
                visited[next.slot()] = false;
            }
            trail.pop();
        }
    }
}
