//! Graph-specific error types.

use hn_core::{ConduitId, HnError, NodeId, PortId};

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph construction and validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A port refers to a node that doesn't exist.
    InvalidNodeRef { port: PortId, node: NodeId },

    /// A port refers to a conduit that doesn't exist.
    InvalidConduitRef { port: PortId, conduit: ConduitId },

    /// A port's conduit field doesn't match the conduit containing it.
    PortConduitMismatch {
        port: PortId,
        expected: ConduitId,
        actual: ConduitId,
    },

    /// Adjacency list is inconsistent (port in node's list but port doesn't reference node).
    InconsistentAdjacency { port: PortId, node: NodeId },

    /// Two nodes, conduits or loops share a name.
    DuplicateName { what: &'static str, name: String },

    /// Loop assignment for a conduit id the builder never handed out.
    UnknownConduit { conduit: ConduitId },

    /// A conduit may belong to at most two loops.
    TooManyLoops { conduit: String, count: usize },

    /// The same loop was listed twice for one conduit.
    RepeatedLoop { conduit: String, loop_name: String },

    /// The signed conduits of a loop do not close at a node.
    OpenLoop { loop_name: String, node: String },

    /// Lookup by name failed.
    NotFound { what: &'static str, name: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidNodeRef { port, node } => {
                write!(f, "Port {} refers to non-existent node {}", port, node)
            }
            GraphError::InvalidConduitRef { port, conduit } => {
                write!(f, "Port {} refers to non-existent conduit {}", port, conduit)
            }
            GraphError::PortConduitMismatch {
                port,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Port {} should belong to conduit {} but references {}",
                    port, expected, actual
                )
            }
            GraphError::InconsistentAdjacency { port, node } => {
                write!(
                    f,
                    "Port {} in node {}'s adjacency list but doesn't reference that node",
                    port, node
                )
            }
            GraphError::DuplicateName { what, name } => {
                write!(f, "Duplicate {} name '{}'", what, name)
            }
            GraphError::UnknownConduit { conduit } => {
                write!(f, "Conduit {} does not exist", conduit)
            }
            GraphError::TooManyLoops { conduit, count } => {
                write!(
                    f,
                    "Conduit '{}' is assigned to {} loops (at most 2 allowed)",
                    conduit, count
                )
            }
            GraphError::RepeatedLoop { conduit, loop_name } => {
                write!(f, "Conduit '{}' lists loop '{}' twice", conduit, loop_name)
            }
            GraphError::OpenLoop { loop_name, node } => {
                write!(f, "Loop '{}' is not closed at node '{}'", loop_name, node)
            }
            GraphError::NotFound { what, name } => {
                write!(f, "{} '{}' not found", what, name)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for HnError {
    fn from(err: GraphError) -> Self {
        HnError::Invariant {
            what: err.to_string(),
        }
    }
}
