//! The public simulation object.

use crate::config::{RecordingOptions, SimulationConfig};
use crate::history::History;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sirnet_engine::{ProbabilityTables, RandomSource, StateStore, TickMode, TransitionEngine};
use sirnet_graph::GraphIndex;
use sirnet_types::{
    Edge, Generation, MacroState, NodeId, NodeStatus, Result, SimulationError, Step, Transmission,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Discrete-time SIR process on a static network.
///
/// The graph and probability tables are fixed at construction. The state
/// starts with every node susceptible at step 0 and changes only through
/// seeding ([`infect_node_set`](Self::infect_node_set),
/// [`infect_fraction`](Self::infect_fraction)), stepping
/// ([`evolve`](Self::evolve)) and the explicit [`clear`](Self::clear) /
/// [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct DiscreteSir<R = ChaCha8Rng> {
    engine: TransitionEngine,
    store: StateStore,
    rng: R,
    recording: RecordingOptions,
    history: History,
}

impl DiscreteSir {
    /// Build a sequential simulation with the default seed.
    ///
    /// The node count is inferred from the edge list and self-loops are
    /// rejected.
    pub fn new(
        edges: &[Edge],
        recovery_probability: f64,
        infection_probability: Vec<f64>,
    ) -> Result<Self> {
        Self::from_config(
            edges,
            SimulationConfig::new(recovery_probability, infection_probability),
        )
    }

    /// Build a simulation from a configuration.
    pub fn from_config(edges: &[Edge], config: SimulationConfig) -> Result<Self> {
        let graph = match config.node_count {
            Some(node_count) => GraphIndex::with_node_count(node_count, edges, config.self_loops)?,
            None => GraphIndex::build_with_policy(edges, config.self_loops)?,
        };
        let tables = ProbabilityTables::validate(
            config.recovery_probability,
            config.infection_probability,
            graph.max_degree(),
        )?;

        Ok(Self::with_rng(
            Arc::new(graph),
            Arc::new(tables),
            ChaCha8Rng::seed_from_u64(config.seed),
        )?
        .with_mode(config.tick_mode)
        .with_recording(config.recording))
    }
}

impl<R: RngCore> DiscreteSir<R> {
    /// Build a sequential simulation around an injected generator.
    ///
    /// Fails with `InvalidProbability` if `tables` were validated against a
    /// smaller maximum degree than `graph` has.
    pub fn with_rng(graph: Arc<GraphIndex>, tables: Arc<ProbabilityTables>, rng: R) -> Result<Self> {
        if tables.max_degree() < graph.max_degree() {
            return Err(SimulationError::InvalidProbability(format!(
                "tables cover degrees up to {}, graph has max degree {}",
                tables.max_degree(),
                graph.max_degree()
            )));
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            max_degree = graph.max_degree(),
            recovery_probability = tables.recovery_probability(),
            "Created SIR simulation"
        );

        let node_count = graph.node_count();
        Ok(Self {
            engine: TransitionEngine::new(graph, tables),
            store: StateStore::new(node_count),
            rng,
            recording: RecordingOptions::default(),
            history: History::new(node_count),
        })
    }

    /// Set the step evaluation mode.
    pub fn with_mode(mut self, mode: TickMode) -> Self {
        self.engine = self.engine.with_mode(mode);
        self
    }

    /// Set what history to record from now on.
    ///
    /// Recording transmissions draws from the simulation's generator to pick
    /// each infector, so the same seed gives a different trajectory with it
    /// turned on. Macro-state recording draws nothing.
    pub fn with_recording(mut self, recording: RecordingOptions) -> Self {
        self.recording = recording;
        self
    }

    /// Make every susceptible node in `nodes` infectious.
    ///
    /// No randomness is involved. Nodes that are already infectious or
    /// recovered are left alone. All ids are checked before anything changes,
    /// so an `UnknownNode` error leaves the state untouched.
    pub fn infect_node_set(&mut self, nodes: &BTreeSet<NodeId>) -> Result<()> {
        let graph = self.engine.graph().clone();
        for &node in nodes {
            graph.check_node(node)?;
        }

        let mut seeded = 0usize;
        for &node in nodes {
            if self.store.status(node).is_susceptible() {
                self.seed_node(&graph, node);
                seeded += 1;
            }
        }

        info!(
            requested = nodes.len(),
            seeded,
            step = self.store.step().0,
            "Seeded infectious nodes"
        );
        Ok(())
    }

    /// Infect `floor(N * fraction)` nodes picked uniformly among the
    /// susceptible ones, or all of them if fewer remain.
    ///
    /// Returns the number of nodes infected.
    pub fn infect_fraction(&mut self, fraction: f64) -> Result<usize> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SimulationError::InvalidFraction(fraction));
        }

        let mut candidates: Vec<NodeId> = self.store.nodes_with(NodeStatus::Susceptible).collect();
        let wanted = (self.size() as f64 * fraction).floor() as usize;
        let count = wanted.min(candidates.len());

        // Partial Fisher-Yates: the first `count` slots end up a uniform sample.
        for i in 0..count {
            let j = i + self.rng.pick(candidates.len() - i);
            candidates.swap(i, j);
        }

        let graph = self.engine.graph().clone();
        for &node in &candidates[..count] {
            self.seed_node(&graph, node);
        }

        info!(
            fraction,
            seeded = count,
            step = self.store.step().0,
            "Seeded random fraction"
        );
        Ok(count)
    }

    fn seed_node(&mut self, graph: &GraphIndex, node: NodeId) {
        self.store.set_status(graph, node, NodeStatus::Infectious);
        self.history.record_seed(node);
    }

    /// Advance the process by exactly `steps` steps.
    ///
    /// Once no transition can happen any more (no infectious node, and no
    /// spontaneous infection possible) the remaining steps are skipped
    /// without drawing. The step counter still ends at `start + steps` and
    /// the macro-state history still gets one entry per step, so the outcome
    /// is the same as running every step.
    ///
    /// An error aborts the step in progress without committing it; steps
    /// completed before it stay committed.
    pub fn evolve(&mut self, steps: u64) -> Result<()> {
        if self.recording.macro_states && self.history.macro_states().is_empty() {
            self.history.record_macro_state(self.store.macro_state());
        }

        let target = self.store.step().advance(steps);
        while self.store.step() < target {
            if self.is_frozen() {
                debug!(
                    step = self.store.step().0,
                    skipped = target.0 - self.store.step().0,
                    "No transition possible, skipping remaining steps"
                );
                self.skip_to(target);
                break;
            }
            self.step_once()?;
        }

        Ok(())
    }

    /// Jump to `target` with the state unchanged, recording every skipped
    /// step as if it had been run.
    fn skip_to(&mut self, target: Step) {
        if self.recording.macro_states {
            let counts = self.store.counts();
            let mut step = self.store.step();
            while step < target {
                step = step.next();
                self.history.record_macro_state(MacroState::new(step, counts));
            }
        }
        self.store.set_step(target);
    }

    fn step_once(&mut self) -> Result<()> {
        let transitions = self.engine.plan(&self.store, &mut self.rng)?;

        if self.recording.transmissions {
            self.history.record_transmissions(
                self.store.step().next(),
                &transitions,
                &self.store,
                self.engine.graph(),
                &mut self.rng,
            );
        }

        self.engine.commit(&mut self.store, &transitions);

        if self.recording.macro_states {
            self.history.record_macro_state(self.store.macro_state());
        }
        Ok(())
    }

    /// Check if no further transition can ever happen.
    fn is_frozen(&self) -> bool {
        let counts = self.store.counts();
        counts.infectious == 0
            && (counts.susceptible == 0 || !self.engine.tables().allows_spontaneous_infection())
    }

    /// Every node back to susceptible. The step counter and recorded history
    /// are kept.
    pub fn clear(&mut self) {
        self.store.clear();
        self.history.clear_generations();
    }

    /// Back to the initial state at step 0, with recorded history dropped.
    ///
    /// The generator is not reseeded; use [`seed`](Self::seed) for that.
    pub fn reset(&mut self) {
        self.store.clear();
        self.store.set_step(Step::ZERO);
        self.history.clear();
    }

    /// Current `(S, I, R)` counts.
    pub fn get_current_macro_state(&self) -> MacroState {
        self.store.macro_state()
    }

    /// Current status of every node, indexed by node id.
    pub fn get_current_micro_state(&self) -> Vec<NodeStatus> {
        self.store.statuses().to_vec()
    }

    /// Current status of every node, borrowed.
    pub fn statuses(&self) -> &[NodeStatus] {
        self.store.statuses()
    }

    /// Current status of one node.
    pub fn status(&self, node: NodeId) -> Result<NodeStatus> {
        self.engine.graph().check_node(node)?;
        Ok(self.store.status(node))
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.store.node_count()
    }

    /// Steps evolved since construction or the last reset.
    pub fn current_step(&self) -> Step {
        self.store.step()
    }

    /// Check if no node is infectious.
    pub fn is_extinct(&self) -> bool {
        self.store.counts().infectious == 0
    }

    /// Infectious nodes in ascending id order.
    pub fn infected_nodes(&self) -> Vec<NodeId> {
        self.store.nodes_with(NodeStatus::Infectious).collect()
    }

    /// Recovered nodes in ascending id order.
    pub fn recovered_nodes(&self) -> Vec<NodeId> {
        self.store.nodes_with(NodeStatus::Recovered).collect()
    }

    /// Number of infectious neighbours of `node`.
    pub fn infected_degree(&self, node: NodeId) -> Result<usize> {
        self.engine.graph().check_node(node)?;
        Ok(self.store.infected_degree(node))
    }

    /// Generation of `node`, when transmissions are being recorded.
    pub fn generation(&self, node: NodeId) -> Option<Generation> {
        self.history.generation(node)
    }

    /// The contact network.
    pub fn graph(&self) -> &GraphIndex {
        self.engine.graph()
    }

    /// The probability tables.
    pub fn tables(&self) -> &ProbabilityTables {
        self.engine.tables()
    }

    /// The step evaluation mode.
    pub fn tick_mode(&self) -> TickMode {
        self.engine.mode()
    }

    /// Recorded macro states, oldest first.
    pub fn macro_state_history(&self) -> &[MacroState] {
        self.history.macro_states()
    }

    /// Recorded transmissions, in the order they happened.
    pub fn transmission_tree(&self) -> &[Transmission] {
        self.history.transmissions()
    }
}

impl<R: RngCore + SeedableRng> DiscreteSir<R> {
    /// Reseed the generator.
    pub fn seed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}
