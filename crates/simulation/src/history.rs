//! Opt-in record of how an epidemic unfolded.

use sirnet_engine::{RandomSource, StateStore};
use sirnet_graph::GraphIndex;
use sirnet_types::{Generation, MacroState, NodeId, Step, Transition, Transmission};

/// Macro-state trajectory and transmission tree of one simulation.
///
/// Generations are tracked for every infection once transmissions are being
/// recorded: seeds and spontaneous infections are generation 0, everything
/// else is one more than the neighbour it is attributed to.
#[derive(Debug, Clone, Default)]
pub struct History {
    macro_states: Vec<MacroState>,
    transmissions: Vec<Transmission>,
    generations: Vec<Option<Generation>>,
}

impl History {
    /// Empty history for `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            macro_states: Vec::new(),
            transmissions: Vec::new(),
            generations: vec![None; node_count],
        }
    }

    /// Recorded macro states, oldest first.
    pub fn macro_states(&self) -> &[MacroState] {
        &self.macro_states
    }

    /// Recorded transmissions, in the order they happened.
    pub fn transmissions(&self) -> &[Transmission] {
        &self.transmissions
    }

    /// Generation of `node`, if it was infected while generations were tracked.
    pub fn generation(&self, node: NodeId) -> Option<Generation> {
        self.generations.get(node.index()).copied().flatten()
    }

    pub(crate) fn record_macro_state(&mut self, state: MacroState) {
        self.macro_states.push(state);
    }

    /// Mark a directly seeded node as the root of a chain.
    pub(crate) fn record_seed(&mut self, node: NodeId) {
        self.generations[node.index()] = Some(0);
    }

    /// Attribute each planned infection to one infectious neighbour.
    ///
    /// Must run before the transitions are committed: infectors are drawn
    /// uniformly among the infectee's neighbours that are infectious in the
    /// snapshot the step was planned on.
    pub(crate) fn record_transmissions(
        &mut self,
        step: Step,
        transitions: &[Transition],
        store: &StateStore,
        graph: &GraphIndex,
        rng: &mut impl RandomSource,
    ) {
        for transition in transitions {
            let Transition::Infection {
                node: infectee,
                infected_degree,
            } = *transition
            else {
                continue;
            };

            let candidates = store.infected_neighbors(graph, infectee);
            if candidates.is_empty() {
                self.generations[infectee.index()] = Some(0);
                continue;
            }

            let infector = candidates[rng.pick(candidates.len())];
            let generation = self.generation(infector).unwrap_or(0);
            self.generations[infectee.index()] = Some(generation + 1);
            self.transmissions.push(Transmission {
                step,
                generation,
                infector,
                infectee,
                infected_degree,
            });
        }
    }

    /// Forget generations; recorded trajectories are kept.
    pub(crate) fn clear_generations(&mut self) {
        self.generations.fill(None);
    }

    /// Forget everything.
    pub(crate) fn clear(&mut self) {
        self.macro_states.clear();
        self.transmissions.clear();
        self.clear_generations();
    }
}
