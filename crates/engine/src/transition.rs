//! One synchronous step of the SIR process.

use crate::probability::ProbabilityTables;
use crate::random::{node_stream, RandomSource};
use crate::store::StateStore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sirnet_graph::GraphIndex;
use sirnet_types::{NodeId, NodeStatus, Result, Transition};
use std::sync::Arc;
use tracing::debug;

/// How the per-node trials of a step are evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickMode {
    /// One shared stream, consumed in a fixed order: every infectious node
    /// (ascending id) draws its recovery trial, then every susceptible node
    /// (ascending id) draws its infection trial.
    #[default]
    Sequential,

    /// Nodes are evaluated on the rayon pool. Each step draws one key from the
    /// shared stream and every node uses a private stream derived from that key
    /// and its id, so results do not depend on thread count or scheduling.
    ///
    /// Trajectories differ from [`TickMode::Sequential`] for the same seed.
    Parallel,
}

/// Plans and applies steps against an immutable graph and probability tables.
#[derive(Debug, Clone)]
pub struct TransitionEngine {
    graph: Arc<GraphIndex>,
    tables: Arc<ProbabilityTables>,
    mode: TickMode,
}

impl TransitionEngine {
    /// Create a sequential engine.
    pub fn new(graph: Arc<GraphIndex>, tables: Arc<ProbabilityTables>) -> Self {
        Self {
            graph,
            tables,
            mode: TickMode::default(),
        }
    }

    /// Set the evaluation mode.
    pub fn with_mode(mut self, mode: TickMode) -> Self {
        self.mode = mode;
        self
    }

    /// The contact network.
    pub fn graph(&self) -> &Arc<GraphIndex> {
        &self.graph
    }

    /// The probability tables.
    pub fn tables(&self) -> &Arc<ProbabilityTables> {
        &self.tables
    }

    /// The evaluation mode.
    pub fn mode(&self) -> TickMode {
        self.mode
    }

    /// Decide every transition of the next step without touching `store`.
    ///
    /// Recoveries come first in the returned list, each group in ascending
    /// node order, regardless of mode.
    pub fn plan(&self, store: &StateStore, rng: &mut impl RandomSource) -> Result<Vec<Transition>> {
        match self.mode {
            TickMode::Sequential => self.plan_sequential(store, rng),
            TickMode::Parallel => self.plan_parallel(store, rng.next_key()),
        }
    }

    /// Plan one step and commit it.
    ///
    /// On error nothing is committed and the step counter does not move.
    pub fn tick(
        &self,
        store: &mut StateStore,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<Transition>> {
        let transitions = self.plan(store, rng)?;
        self.commit(store, &transitions);
        Ok(transitions)
    }

    /// Apply transitions produced by [`plan`](Self::plan) on the same snapshot.
    pub fn commit(&self, store: &mut StateStore, transitions: &[Transition]) {
        store.commit(&self.graph, transitions);

        debug!(
            step = store.step().0,
            recoveries = transitions
                .iter()
                .filter(|t| matches!(t, Transition::Recovery { .. }))
                .count(),
            infections = transitions
                .iter()
                .filter(|t| matches!(t, Transition::Infection { .. }))
                .count(),
            infectious = store.counts().infectious,
            "Step committed"
        );
    }

    fn plan_sequential(
        &self,
        store: &StateStore,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<Transition>> {
        let mut transitions = Vec::new();

        for node in store.nodes_with(NodeStatus::Infectious) {
            if let Some(t) = self.decide(store, node, rng)? {
                transitions.push(t);
            }
        }
        for node in store.nodes_with(NodeStatus::Susceptible) {
            if let Some(t) = self.decide(store, node, rng)? {
                transitions.push(t);
            }
        }

        Ok(transitions)
    }

    fn plan_parallel(&self, store: &StateStore, step_key: u64) -> Result<Vec<Transition>> {
        let decided: Vec<Option<Transition>> = (0..store.node_count())
            .into_par_iter()
            .map(|i| {
                let node = NodeId(i as u32);
                let mut stream = node_stream(step_key, node);
                self.decide(store, node, &mut stream)
            })
            .collect::<Result<_>>()?;

        let (mut recoveries, infections): (Vec<_>, Vec<_>) = decided
            .into_iter()
            .flatten()
            .partition(|t| matches!(t, Transition::Recovery { .. }));
        recoveries.extend(infections);

        Ok(recoveries)
    }

    /// The trial for a single node, read from the committed snapshot.
    fn decide(
        &self,
        store: &StateStore,
        node: NodeId,
        rng: &mut impl RandomSource,
    ) -> Result<Option<Transition>> {
        let transition = match store.status(node) {
            NodeStatus::Infectious => rng
                .bernoulli(self.tables.recovery_probability())
                .then_some(Transition::Recovery { node }),
            NodeStatus::Susceptible => {
                let infected_degree = store.infected_degree(node);
                let chance = self.tables.infection_chance(infected_degree)?;
                rng.bernoulli(chance).then_some(Transition::Infection {
                    node,
                    infected_degree,
                })
            }
            NodeStatus::Recovered => None,
        };
        Ok(transition)
    }
}
