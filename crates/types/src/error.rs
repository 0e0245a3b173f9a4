//! Error types for the epidemic engine.

use crate::NodeId;
use thiserror::Error;

/// Errors raised while building or driving a simulation.
///
/// All of these are caller or programmer errors; none is transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The edge list cannot describe a simple graph over the declared nodes.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// A probability is outside `[0, 1]` or the infection table is too short.
    #[error("Invalid probability: {0}")]
    InvalidProbability(String),

    /// An infected degree exceeded the infection table at runtime.
    #[error("Infected degree {infected_degree} exceeds table bound {max_degree}")]
    OutOfRange {
        infected_degree: usize,
        max_degree: usize,
    },

    /// A node id outside `[0, N)`.
    #[error("Unknown node {node} (graph has {node_count} nodes)")]
    UnknownNode { node: NodeId, node_count: usize },

    /// A seeding fraction outside `[0, 1]`.
    #[error("Invalid fraction: {0}")]
    InvalidFraction(f64),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SimulationError>;
