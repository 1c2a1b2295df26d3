//! hn-graph: topology layer for hydronet.
//!
//! Provides:
//! - Core graph data structures (Node, ConduitEdge, Port, Loop, Graph)
//! - Incremental builder with validation (names, references, closed loops)
//! - Flow-path enumeration between two nodes
//!
//! # Example
//!
//! ```
//! use hn_graph::{GraphBuilder, LoopSense};
//!
//! let mut builder = GraphBuilder::new();
//! let s0 = builder.add_node("S0");
//! let r0 = builder.add_node("R0");
//! let p1 = builder.add_conduit("P1", s0, r0);
//! let p2 = builder.add_conduit("P2", r0, s0);
//! builder.assign_loops(p1, &["L1"], LoopSense::Clockwise).unwrap();
//! builder.assign_loops(p2, &["L1"], LoopSense::Clockwise).unwrap();
//! let graph = builder.build().unwrap();
//!
//! assert_eq!(graph.nodes().len(), 2);
//! assert_eq!(graph.loops().len(), 1);
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod paths;
pub(crate) mod validate;

pub use builder::GraphBuilder;
pub use error::{GraphError, GraphResult};
pub use graph::{ConduitEdge, Graph, Loop, LoopMember, LoopSense, Node, Port, PortKind};
pub use paths::FlowPath;
