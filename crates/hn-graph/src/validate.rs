//! Graph validation logic.

use std::collections::{BTreeMap, HashSet};

use hn_core::{NodeId, PortId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{ConduitEdge, Graph, Node, Port, PortKind};

/// Node and conduit names must be unique.
pub(crate) fn validate_names(nodes: &[Node], conduits: &[ConduitEdge]) -> GraphResult<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(GraphError::DuplicateName {
                what: "node",
                name: node.name.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for conduit in conduits {
        if !seen.insert(conduit.name.as_str()) {
            return Err(GraphError::DuplicateName {
                what: "conduit",
                name: conduit.name.clone(),
            });
        }
    }
    Ok(())
}

/// All references exist and ports agree with the conduits that own them.
pub(crate) fn validate_structure(
    nodes: &[Node],
    conduits: &[ConduitEdge],
    ports: &[Port],
) -> GraphResult<()> {
    for (i, port) in ports.iter().enumerate() {
        if port.id.slot() != i {
            return Err(GraphError::InconsistentAdjacency {
                port: port.id,
                node: port.node,
            });
        }
        if port.node.slot() >= nodes.len() {
            return Err(GraphError::InvalidNodeRef {
                port: port.id,
                node: port.node,
            });
        }
        if port.conduit.slot() >= conduits.len() {
            return Err(GraphError::InvalidConduitRef {
                port: port.id,
                conduit: port.conduit,
            });
        }
    }

    for conduit in conduits {
        for (&port_id, kind) in conduit.ports.iter().zip([PortKind::Start, PortKind::End]) {
            let port = ports
                .get(port_id.slot())
                .ok_or(GraphError::InvalidConduitRef {
                    port: port_id,
                    conduit: conduit.id,
                })?;
            if port.conduit != conduit.id || port.kind != kind {
                return Err(GraphError::PortConduitMismatch {
                    port: port_id,
                    expected: conduit.id,
                    actual: port.conduit,
                });
            }
        }
    }

    Ok(())
}

/// Validate adjacency lists for consistency.
pub(crate) fn validate_adjacency(
    nodes: &[Node],
    ports: &[Port],
    node_port_offsets: &[usize],
    node_ports: &[PortId],
) -> GraphResult<()> {
    if node_port_offsets.len() != nodes.len() + 1 {
        return Err(GraphError::InconsistentAdjacency {
            port: PortId::from_index(0),
            node: nodes.first().map_or(NodeId::from_index(0), |n| n.id),
        });
    }

    for node in nodes {
        let idx = node.id.slot();
        let start = node_port_offsets[idx];
        let end = node_port_offsets[idx + 1];

        for &port_id in &node_ports[start..end] {
            match ports.get(port_id.slot()) {
                Some(port) if port.node == node.id => {}
                _ => {
                    return Err(GraphError::InconsistentAdjacency {
                        port: port_id,
                        node: node.id,
                    });
                }
            }
        }
    }

    // every port appears in exactly one node's list
    let mut ports_in_adj: HashSet<PortId> = HashSet::new();
    for &port_id in node_ports {
        if !ports_in_adj.insert(port_id) {
            return Err(GraphError::InconsistentAdjacency {
                port: port_id,
                node: ports[port_id.slot()].node,
            });
        }
    }
    for port in ports {
        if !ports_in_adj.contains(&port.id) {
            return Err(GraphError::InconsistentAdjacency {
                port: port.id,
                node: port.node,
            });
        }
    }

    Ok(())
}

/// Every loop must close: walking its members with their signs, each node is
/// entered as often as it is left.
pub(crate) fn validate_loops(graph: &Graph) -> GraphResult<()> {
    for lp in graph.loops() {
        let mut net: BTreeMap<NodeId, f64> = BTreeMap::new();
        for member in &lp.members {
            let edge = &graph.conduits[member.conduit.slot()];
            let direction = member.sign * edge.sense.factor();
            let start = graph.ports[edge.start_port().slot()].node;
            let end = graph.ports[edge.end_port().slot()].node;
            *net.entry(start).or_default() -= direction;
            *net.entry(end).or_default() += direction;
        }

        if let Some((&node, _)) = net.iter().find(|&(_, &v)| v != 0.0) {
            return Err(GraphError::OpenLoop {
                loop_name: lp.name.clone(),
                node: graph.node_name(node).to_string(),
            });
        }
    }
    Ok(())
}
