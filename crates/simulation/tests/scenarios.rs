//! End-to-end scenarios with known outcomes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sirnet_simulation::{DiscreteSir, RecordingOptions, SimulationConfig, TickMode};
use sirnet_types::{Edge, MacroState, NodeId, NodeStatus, Step};
use std::collections::{BTreeSet, VecDeque};
use tracing_test::traced_test;

fn edges(pairs: &[(u32, u32)]) -> Vec<Edge> {
    pairs.iter().map(|&(a, b)| (NodeId(a), NodeId(b))).collect()
}

fn seeds(ids: &[u32]) -> BTreeSet<NodeId> {
    ids.iter().copied().map(NodeId).collect()
}

fn ring4() -> Vec<Edge> {
    edges(&[(0, 1), (1, 2), (2, 3), (3, 0)])
}

/// G(n, p) without self-loops, from a fixed seed.
fn random_graph(n: u32, p: f64, seed: u64) -> Vec<Edge> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            if rng.gen_bool(p) {
                out.push((NodeId(a), NodeId(b)));
            }
        }
    }
    out
}

fn max_degree(n: usize, edges: &[Edge]) -> usize {
    let mut degrees = vec![0usize; n];
    for &(a, b) in edges {
        degrees[a.index()] += 1;
        degrees[b.index()] += 1;
    }
    degrees.into_iter().max().unwrap_or(0)
}

/// Nodes reachable from `from`, including `from` itself.
fn reachable(n: usize, edges: &[Edge], from: &BTreeSet<NodeId>) -> BTreeSet<NodeId> {
    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in edges {
        adjacency[a.index()].push(b);
        adjacency[b.index()].push(a);
    }
    let mut seen: BTreeSet<NodeId> = from.clone();
    let mut queue: VecDeque<NodeId> = from.iter().copied().collect();
    while let Some(node) = queue.pop_front() {
        for &next in &adjacency[node.index()] {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

#[traced_test]
#[test]
fn test_ring_scenario() {
    let mut sir = DiscreteSir::new(&ring4(), 1.0, vec![0.0, 1.0, 1.0, 1.0]).unwrap();
    sir.infect_node_set(&seeds(&[0])).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (3, 1, 0));

    sir.evolve(1).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (1, 2, 1));
    assert_eq!(sir.infected_nodes(), vec![NodeId(1), NodeId(3)]);

    sir.evolve(1).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (0, 1, 3));
    assert_eq!(sir.infected_nodes(), vec![NodeId(2)]);

    sir.evolve(1).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (0, 0, 4));

    sir.evolve(5).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (0, 0, 4));
    assert_eq!(sir.current_step(), Step(8));
}

#[test]
fn test_ring_scenario_parallel() {
    let config = SimulationConfig::new(1.0, vec![0.0, 1.0, 1.0]).parallel();
    let mut sir = DiscreteSir::from_config(&ring4(), config).unwrap();
    assert_eq!(sir.tick_mode(), TickMode::Parallel);
    sir.infect_node_set(&seeds(&[0])).unwrap();

    let mut trajectory = Vec::new();
    for _ in 0..3 {
        sir.evolve(1).unwrap();
        trajectory.push(sir.get_current_macro_state().sir());
    }

    assert_eq!(trajectory, vec![(1, 2, 1), (0, 1, 3), (0, 0, 4)]);
}

#[test]
fn test_seeds_recover_after_one_step_when_nothing_spreads() {
    let n = 200;
    let graph = random_graph(n, 0.05, 11);
    let table = vec![0.0; max_degree(n as usize, &graph) + 1];
    let config = SimulationConfig::new(1.0, table).with_node_count(n as usize);
    let mut sir = DiscreteSir::from_config(&graph, config).unwrap();

    let seed_set = seeds(&[3, 50, 120, 199]);
    sir.infect_node_set(&seed_set).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (196, 4, 0));

    sir.evolve(1).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (196, 0, 4));
    assert_eq!(sir.recovered_nodes(), seed_set.into_iter().collect::<Vec<_>>());

    sir.evolve(10).unwrap();
    assert_eq!(sir.get_current_macro_state().sir(), (196, 0, 4));
}

#[test]
fn test_certain_infection_reaches_whole_component() {
    // Two disjoint random graphs: nodes 0..60 and 60..100.
    let mut graph = random_graph(60, 0.08, 3);
    graph.extend(
        random_graph(40, 0.1, 4)
            .into_iter()
            .map(|(a, b)| (NodeId(a.0 + 60), NodeId(b.0 + 60))),
    );
    let n = 100usize;
    let mut table = vec![1.0; max_degree(n, &graph) + 1];
    table[0] = 0.0;
    let config = SimulationConfig::new(0.0, table).with_node_count(n);
    let mut sir = DiscreteSir::from_config(&graph, config).unwrap();

    let seed_set = seeds(&[0]);
    sir.infect_node_set(&seed_set).unwrap();
    let mut previous = sir.get_current_macro_state().counts.infectious;
    for _ in 0..n {
        sir.evolve(1).unwrap();
        let infectious = sir.get_current_macro_state().counts.infectious;
        assert!(infectious >= previous);
        previous = infectious;
    }

    let expected = reachable(n, &graph, &seed_set);
    let infected: BTreeSet<NodeId> = sir.infected_nodes().into_iter().collect();
    assert_eq!(infected, expected);
    assert!(sir.recovered_nodes().is_empty());
}

#[test]
fn test_same_seed_same_trajectory() {
    let n = 300u32;
    let graph = random_graph(n, 0.03, 21);
    let table: Vec<f64> = (0..=max_degree(n as usize, &graph))
        .map(|k| 1.0 - 0.85f64.powi(k as i32))
        .collect();

    for mode in [TickMode::Sequential, TickMode::Parallel] {
        let config = SimulationConfig::new(0.4, table.clone())
            .with_node_count(n as usize)
            .with_seed(2024)
            .with_tick_mode(mode);

        let run = || {
            let mut sir = DiscreteSir::from_config(&graph, config.clone()).unwrap();
            sir.infect_node_set(&seeds(&[0, 150])).unwrap();
            let mut trajectory: Vec<MacroState> = Vec::new();
            for _ in 0..40 {
                sir.evolve(1).unwrap();
                trajectory.push(sir.get_current_macro_state());
            }
            (trajectory, sir.get_current_micro_state())
        };

        assert_eq!(run(), run(), "mode {mode:?} is not reproducible");
    }
}

#[test]
fn test_history_and_transmission_tree() {
    let config =
        SimulationConfig::new(1.0, vec![0.0, 1.0, 1.0]).with_recording(RecordingOptions::all());
    let mut sir = DiscreteSir::from_config(&ring4(), config).unwrap();
    sir.infect_node_set(&seeds(&[0])).unwrap();

    sir.evolve(10).unwrap();

    let history: Vec<_> = sir
        .macro_state_history()
        .iter()
        .map(|m| (m.step, m.sir()))
        .collect();
    let mut expected = vec![
        (Step(0), (3, 1, 0)),
        (Step(1), (1, 2, 1)),
        (Step(2), (0, 1, 3)),
    ];
    // Extinct from step 3 on; the skipped steps are still recorded.
    expected.extend((3..=10).map(|s| (Step(s), (0, 0, 4))));
    assert_eq!(history, expected);
    assert_eq!(sir.current_step(), Step(10));

    let tree = sir.transmission_tree();
    assert_eq!(tree.len(), 3);
    assert_eq!((tree[0].infector, tree[0].infectee), (NodeId(0), NodeId(1)));
    assert_eq!((tree[1].infector, tree[1].infectee), (NodeId(0), NodeId(3)));
    assert!(tree.iter().take(2).all(|t| t.step == Step(1) && t.generation == 0));

    let last = tree[2];
    assert_eq!(last.infectee, NodeId(2));
    assert!(last.infector == NodeId(1) || last.infector == NodeId(3));
    assert_eq!(last.generation, 1);
    assert_eq!(last.infected_degree, 2);
    assert_eq!(last.step, Step(2));
    assert_eq!(sir.generation(NodeId(2)), Some(2));
}

#[test]
fn test_micro_state_matches_macro_state() {
    let n = 120u32;
    let graph = random_graph(n, 0.05, 8);
    let table = vec![0.5; max_degree(n as usize, &graph) + 1];
    let config = SimulationConfig::new(0.2, table)
        .with_node_count(n as usize)
        .with_seed(5);
    let mut sir = DiscreteSir::from_config(&graph, config).unwrap();
    sir.infect_fraction(0.05).unwrap();

    sir.evolve(7).unwrap();

    let micro = sir.get_current_micro_state();
    let macro_state = sir.get_current_macro_state();
    let count = |status| micro.iter().filter(|s| **s == status).count();
    assert_eq!(count(NodeStatus::Susceptible), macro_state.counts.susceptible);
    assert_eq!(count(NodeStatus::Infectious), macro_state.counts.infectious);
    assert_eq!(count(NodeStatus::Recovered), macro_state.counts.recovered);
    assert_eq!(macro_state.step, Step(7));
}
