//! Compartment statuses and aggregate counts.

use crate::Step;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The SIR compartment a node currently belongs to.
///
/// Transitions only ever move forward: `Susceptible -> Infectious -> Recovered`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum NodeStatus {
    /// Can be infected by infectious neighbours.
    #[default]
    Susceptible,
    /// Infects susceptible neighbours and may recover.
    Infectious,
    /// Removed from the process for good.
    Recovered,
}

impl NodeStatus {
    /// The status this one may legally move to, if any.
    pub fn successor(self) -> Option<Self> {
        match self {
            NodeStatus::Susceptible => Some(NodeStatus::Infectious),
            NodeStatus::Infectious => Some(NodeStatus::Recovered),
            NodeStatus::Recovered => None,
        }
    }

    /// Check if the node is susceptible.
    pub fn is_susceptible(self) -> bool {
        matches!(self, NodeStatus::Susceptible)
    }

    /// Check if the node is infectious.
    pub fn is_infectious(self) -> bool {
        matches!(self, NodeStatus::Infectious)
    }

    /// Check if the node is recovered.
    pub fn is_recovered(self) -> bool {
        matches!(self, NodeStatus::Recovered)
    }

    /// Check if the node is, or has ever been, infected.
    pub fn was_infected(self) -> bool {
        !self.is_susceptible()
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeStatus::Susceptible => "S",
            NodeStatus::Infectious => "I",
            NodeStatus::Recovered => "R",
        };
        f.write_str(label)
    }
}

/// Number of nodes in each compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub susceptible: usize,
    pub infectious: usize,
    pub recovered: usize,
}

impl StatusCounts {
    /// All `node_count` nodes susceptible.
    pub fn all_susceptible(node_count: usize) -> Self {
        Self {
            susceptible: node_count,
            infectious: 0,
            recovered: 0,
        }
    }

    /// Total population; constant for the lifetime of a simulation.
    pub fn total(&self) -> usize {
        self.susceptible + self.infectious + self.recovered
    }

    /// Move one node from `from` to `to`.
    pub fn shift(&mut self, from: NodeStatus, to: NodeStatus) {
        *self.slot(from) -= 1;
        *self.slot(to) += 1;
    }

    /// Count for a single compartment.
    pub fn get(&self, status: NodeStatus) -> usize {
        match status {
            NodeStatus::Susceptible => self.susceptible,
            NodeStatus::Infectious => self.infectious,
            NodeStatus::Recovered => self.recovered,
        }
    }

    fn slot(&mut self, status: NodeStatus) -> &mut usize {
        match status {
            NodeStatus::Susceptible => &mut self.susceptible,
            NodeStatus::Infectious => &mut self.infectious,
            NodeStatus::Recovered => &mut self.recovered,
        }
    }
}

/// Aggregate compartment counts at a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroState {
    /// Step at which the counts were taken.
    pub step: Step,
    /// Compartment counts.
    pub counts: StatusCounts,
}

impl MacroState {
    /// Create a macro state.
    pub fn new(step: Step, counts: StatusCounts) -> Self {
        Self { step, counts }
    }

    /// The `(S, I, R)` triple.
    pub fn sir(&self) -> (usize, usize, usize) {
        (
            self.counts.susceptible,
            self.counts.infectious,
            self.counts.recovered,
        )
    }

    /// Check if no node is infectious.
    pub fn is_extinct(&self) -> bool {
        self.counts.infectious == 0
    }
}

impl fmt::Display for MacroState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} S={} I={} R={}",
            self.step, self.counts.susceptible, self.counts.infectious, self.counts.recovered
        )
    }
}
