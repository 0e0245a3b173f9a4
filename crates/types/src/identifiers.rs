//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier.
///
/// Nodes are densely numbered: a graph over `N` nodes uses exactly the ids
/// `0..N`, so a `NodeId` doubles as an index into per-node vectors.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of this node in per-node vectors.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// An undirected contact between two nodes.
pub type Edge = (NodeId, NodeId);

/// Discrete simulation time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Step(pub u64);

impl Step {
    /// The step at which every simulation starts.
    pub const ZERO: Self = Step(0);

    /// Get the next step.
    pub fn next(self) -> Self {
        Step(self.0 + 1)
    }

    /// Advance by `steps`, saturating at `u64::MAX`.
    pub fn advance(self, steps: u64) -> Self {
        Step(self.0.saturating_add(steps))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step({})", self.0)
    }
}
