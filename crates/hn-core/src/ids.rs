use core::fmt;
use core::num::NonZeroU32;

/// Index of a node, conduit, port or loop in a pipe network graph.
///
/// Ids are handed out densely by the graph builder in insertion order, so
/// `slot()` addresses the matching entry of any per-conduit or per-node
/// vector. The index is kept as `index + 1` in a `NonZeroU32`, which makes
/// `Option<Id>` the same size as `Id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Id for the entry at 0-based position `index`.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// 0-based position of the entry.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as a `usize`, for slice access.
    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Junction between conduits.
pub type NodeId = Id;
/// Pipe, duct or pseudo conduit; also the slot of its model in the network.
pub type ConduitId = Id;
/// One end of a conduit attached to a node.
pub type PortId = Id;
/// Closed circuit used by the Hardy Cross corrections.
pub type LoopId = Id;
