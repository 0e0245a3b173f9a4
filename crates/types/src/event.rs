//! Per-step transitions and transmission records.

use crate::{NodeId, NodeStatus, Step};
use serde::{Deserialize, Serialize};

/// Generation of an infection: seeds are generation 0, the nodes they infect
/// generation 1, and so on.
pub type Generation = u32;

/// A single status change planned during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// A susceptible node becomes infectious.
    Infection {
        node: NodeId,
        /// Infectious neighbours the node had at the start of the step.
        infected_degree: usize,
    },
    /// An infectious node recovers.
    Recovery { node: NodeId },
}

impl Transition {
    /// The node whose status changes.
    pub fn node(&self) -> NodeId {
        match self {
            Transition::Infection { node, .. } | Transition::Recovery { node } => *node,
        }
    }

    /// Status the node must have before the transition.
    pub fn from_status(&self) -> NodeStatus {
        match self {
            Transition::Infection { .. } => NodeStatus::Susceptible,
            Transition::Recovery { .. } => NodeStatus::Infectious,
        }
    }

    /// Status the node has after the transition.
    pub fn to_status(&self) -> NodeStatus {
        match self {
            Transition::Infection { .. } => NodeStatus::Infectious,
            Transition::Recovery { .. } => NodeStatus::Recovered,
        }
    }
}

/// One edge of the transmission tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transmission {
    /// Step during which the infection happened.
    pub step: Step,
    /// Generation of the infector.
    pub generation: Generation,
    pub infector: NodeId,
    pub infectee: NodeId,
    /// Infectious neighbours of the infectee when it was infected.
    pub infected_degree: usize,
}
