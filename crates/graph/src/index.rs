//! Compressed adjacency index built from an edge list.

use serde::{Deserialize, Serialize};
use sirnet_types::{Edge, NodeId, Result, SimulationError};
use tracing::{debug, warn};

/// What to do with an edge that connects a node to itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelfLoopPolicy {
    /// Fail construction with `InvalidGraph`.
    #[default]
    Reject,

    /// Drop the edge. The node is still counted towards `N`.
    Ignore,
}

/// Undirected, unweighted, simple graph over the dense ids `0..N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphIndex {
    /// `offsets[n]..offsets[n + 1]` is the slice of `adjacency` holding the
    /// neighbours of node `n`.
    offsets: Vec<usize>,
    /// Sorted, deduplicated neighbour lists, concatenated.
    adjacency: Vec<NodeId>,
    min_degree: usize,
    max_degree: usize,
}

impl GraphIndex {
    /// Build a graph whose node count is inferred as `max id + 1`.
    ///
    /// An empty edge list yields an empty graph. Self-loops are rejected.
    pub fn build(edges: &[Edge]) -> Result<Self> {
        Self::build_with_policy(edges, SelfLoopPolicy::default())
    }

    /// Build a graph with an inferred node count and an explicit self-loop policy.
    pub fn build_with_policy(edges: &[Edge], policy: SelfLoopPolicy) -> Result<Self> {
        let node_count = edges
            .iter()
            .map(|(a, b)| a.index().max(b.index()) + 1)
            .max()
            .unwrap_or(0);
        Self::with_node_count(node_count, edges, policy)
    }

    /// Build a graph over exactly `node_count` nodes.
    ///
    /// Nodes that appear in no edge are isolated. Fails with `InvalidGraph`
    /// if an edge references an id `>= node_count`.
    pub fn with_node_count(
        node_count: usize,
        edges: &[Edge],
        policy: SelfLoopPolicy,
    ) -> Result<Self> {
        if node_count > u32::MAX as usize + 1 {
            return Err(SimulationError::InvalidGraph(format!(
                "{node_count} nodes exceed the id space"
            )));
        }

        let mut lists: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];
        let mut ignored_loops = 0usize;

        for &(a, b) in edges {
            for node in [a, b] {
                if node.index() >= node_count {
                    return Err(SimulationError::InvalidGraph(format!(
                        "edge ({}, {}) references {node} outside 0..{node_count}",
                        a.0, b.0
                    )));
                }
            }

            if a == b {
                match policy {
                    SelfLoopPolicy::Reject => {
                        return Err(SimulationError::InvalidGraph(format!(
                            "self-loop on {a}"
                        )));
                    }
                    SelfLoopPolicy::Ignore => {
                        ignored_loops += 1;
                        continue;
                    }
                }
            }

            lists[a.index()].push(b);
            lists[b.index()].push(a);
        }

        if ignored_loops > 0 {
            warn!(ignored_loops, "Dropped self-loops from edge list");
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut adjacency = Vec::with_capacity(lists.iter().map(Vec::len).sum());
        offsets.push(0);
        for mut neighbours in lists {
            neighbours.sort_unstable();
            neighbours.dedup();
            adjacency.extend(neighbours);
            offsets.push(adjacency.len());
        }

        let degrees = offsets.windows(2).map(|w| w[1] - w[0]);
        let min_degree = degrees.clone().min().unwrap_or(0);
        let max_degree = degrees.max().unwrap_or(0);

        let graph = Self {
            offsets,
            adjacency,
            min_degree,
            max_degree,
        };

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            min_degree,
            max_degree,
            "Built graph index"
        );

        Ok(graph)
    }

    /// Number of nodes `N`.
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.len() / 2
    }

    /// Check if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Check if `node` lies in `0..N`.
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    /// Fail with `UnknownNode` unless `node` lies in `0..N`.
    pub fn check_node(&self, node: NodeId) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(SimulationError::UnknownNode {
                node,
                node_count: self.node_count(),
            })
        }
    }

    /// Iterate over all node ids in ascending order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(|i| NodeId(i as u32))
    }

    /// Sorted neighbours of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not in the graph.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        let i = node.index();
        &self.adjacency[self.offsets[i]..self.offsets[i + 1]]
    }

    /// Number of distinct neighbours of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not in the graph.
    pub fn degree(&self, node: NodeId) -> usize {
        let i = node.index();
        self.offsets[i + 1] - self.offsets[i]
    }

    /// Smallest degree over all nodes (0 for an empty graph).
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Largest degree over all nodes (0 for an empty graph).
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }
}
