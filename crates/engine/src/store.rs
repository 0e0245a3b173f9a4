//! Per-node statuses with incrementally maintained aggregates.

use sirnet_graph::GraphIndex;
use sirnet_types::{MacroState, NodeId, NodeStatus, StatusCounts, Step, Transition};
use tracing::trace;

/// The live state of a simulation.
///
/// Besides one status per node, the store keeps two derived views up to date
/// on every change so that neither ever needs a full scan:
///
/// 1. the compartment counts, and
/// 2. for every node, how many of its neighbours are currently infectious.
///
/// Both views only move when a status changes, through
/// [`set_status`](Self::set_status) or [`commit`](Self::commit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    statuses: Vec<NodeStatus>,
    infected_degrees: Vec<usize>,
    counts: StatusCounts,
    step: Step,
}

impl StateStore {
    /// All nodes susceptible, at step zero.
    pub fn new(node_count: usize) -> Self {
        Self {
            statuses: vec![NodeStatus::Susceptible; node_count],
            infected_degrees: vec![0; node_count],
            counts: StatusCounts::all_susceptible(node_count),
            step: Step::ZERO,
        }
    }

    /// Number of nodes tracked.
    pub fn node_count(&self) -> usize {
        self.statuses.len()
    }

    /// Current status of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not tracked.
    pub fn status(&self, node: NodeId) -> NodeStatus {
        self.statuses[node.index()]
    }

    /// All statuses, indexed by node id.
    pub fn statuses(&self) -> &[NodeStatus] {
        &self.statuses
    }

    /// Number of infectious neighbours of `node`.
    pub fn infected_degree(&self, node: NodeId) -> usize {
        self.infected_degrees[node.index()]
    }

    /// Infectious neighbours of `node`, in ascending id order.
    pub fn infected_neighbors(&self, graph: &GraphIndex, node: NodeId) -> Vec<NodeId> {
        graph
            .neighbors(node)
            .iter()
            .copied()
            .filter(|&n| self.status(n).is_infectious())
            .collect()
    }

    /// Compartment counts.
    pub fn counts(&self) -> StatusCounts {
        self.counts
    }

    /// Steps committed so far.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Move the step counter without changing any status.
    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    /// Counts at the current step.
    pub fn macro_state(&self) -> MacroState {
        MacroState::new(self.step, self.counts)
    }

    /// Iterate over nodes with the given status, in ascending id order.
    pub fn nodes_with(&self, status: NodeStatus) -> impl Iterator<Item = NodeId> + '_ {
        self.statuses
            .iter()
            .enumerate()
            .filter(move |(_, s)| **s == status)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Overwrite the status of `node`, keeping counts and infected degrees
    /// consistent.
    ///
    /// This does not enforce the `S -> I -> R` order; callers are seeding
    /// (`S -> I`), committing planned transitions, or clearing the epidemic.
    pub fn set_status(&mut self, graph: &GraphIndex, node: NodeId, status: NodeStatus) {
        let previous = self.statuses[node.index()];
        if previous == status {
            return;
        }

        self.statuses[node.index()] = status;
        self.counts.shift(previous, status);

        match (previous.is_infectious(), status.is_infectious()) {
            (false, true) => {
                for &neighbor in graph.neighbors(node) {
                    self.infected_degrees[neighbor.index()] += 1;
                }
            }
            (true, false) => {
                for &neighbor in graph.neighbors(node) {
                    self.infected_degrees[neighbor.index()] -= 1;
                }
            }
            _ => {}
        }
    }

    /// Apply one step's planned transitions and advance the step counter.
    ///
    /// Every transition must have been planned against the state this store
    /// holds right now.
    pub fn commit(&mut self, graph: &GraphIndex, transitions: &[Transition]) {
        for transition in transitions {
            let node = transition.node();
            debug_assert_eq!(
                self.status(node),
                transition.from_status(),
                "transition planned against a stale snapshot"
            );
            self.set_status(graph, node, transition.to_status());
        }
        self.step = self.step.next();

        trace!(
            step = self.step.0,
            changes = transitions.len(),
            "Committed step"
        );
    }

    /// Every node back to susceptible. The step counter is kept.
    pub fn clear(&mut self) {
        self.statuses.fill(NodeStatus::Susceptible);
        self.infected_degrees.fill(0);
        self.counts = StatusCounts::all_susceptible(self.statuses.len());
    }
}
