//! Configuration types for a simulation.

use serde::{Deserialize, Serialize};
use sirnet_engine::TickMode;
use sirnet_graph::SelfLoopPolicy;

/// Configuration for a simulation instance.
///
/// The edge list is not part of the configuration; it comes from whatever
/// generates or imports the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Probability that an infectious node recovers in one step.
    pub recovery_probability: f64,

    /// Entry `k`: probability that a susceptible node with `k` infectious
    /// neighbours becomes infectious in one step. Must cover `0..=max_degree`.
    pub infection_probability: Vec<f64>,

    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Fixed number of nodes. When unset it is inferred from the edge list.
    pub node_count: Option<usize>,

    /// Treatment of self-loops in the edge list.
    pub self_loops: SelfLoopPolicy,

    /// Sequential or parallel step evaluation.
    pub tick_mode: TickMode,

    /// What history to keep while evolving.
    pub recording: RecordingOptions,
}

impl SimulationConfig {
    /// Create a new configuration.
    pub fn new(recovery_probability: f64, infection_probability: Vec<f64>) -> Self {
        Self {
            recovery_probability,
            infection_probability,
            seed: 12345,
            node_count: None,
            self_loops: SelfLoopPolicy::default(),
            tick_mode: TickMode::default(),
            recording: RecordingOptions::default(),
        }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fix the number of nodes, allowing isolated ones.
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = Some(node_count);
        self
    }

    /// Set the self-loop policy.
    pub fn with_self_loops(mut self, policy: SelfLoopPolicy) -> Self {
        self.self_loops = policy;
        self
    }

    /// Set the step evaluation mode.
    pub fn with_tick_mode(mut self, mode: TickMode) -> Self {
        self.tick_mode = mode;
        self
    }

    /// Evaluate steps on the rayon pool.
    pub fn parallel(self) -> Self {
        self.with_tick_mode(TickMode::Parallel)
    }

    /// Set what history to record.
    pub fn with_recording(mut self, recording: RecordingOptions) -> Self {
        self.recording = recording;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(1.0, vec![0.0])
    }
}

/// History kept while evolving. Nothing is kept unless asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingOptions {
    /// Keep the macro state before the first step and after every step.
    pub macro_states: bool,

    /// Keep one transmission record per infection.
    ///
    /// Infectors are drawn from the simulation's generator, so turning this
    /// on changes the trajectory produced by a given seed.
    pub transmissions: bool,
}

impl RecordingOptions {
    /// Record everything.
    pub fn all() -> Self {
        Self {
            macro_states: true,
            transmissions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SimulationConfig::new(0.2, vec![0.0, 0.5])
            .with_seed(7)
            .with_node_count(10)
            .with_self_loops(SelfLoopPolicy::Ignore)
            .parallel()
            .with_recording(RecordingOptions::all());

        assert_eq!(config.seed, 7);
        assert_eq!(config.node_count, Some(10));
        assert_eq!(config.self_loops, SelfLoopPolicy::Ignore);
        assert_eq!(config.tick_mode, TickMode::Parallel);
        assert!(config.recording.transmissions);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{
                "recovery_probability": 0.25,
                "infection_probability": [0.0, 0.1, 0.2],
                "recording": { "macro_states": true }
            }"#,
        )
        .unwrap();

        assert_eq!(config.recovery_probability, 0.25);
        assert_eq!(config.infection_probability, vec![0.0, 0.1, 0.2]);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.tick_mode, TickMode::Sequential);
        assert!(config.recording.macro_states);
        assert!(!config.recording.transmissions);
    }
}
