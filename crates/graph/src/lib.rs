//! Immutable contact-network index.
//!
//! A [`GraphIndex`] is built once from an edge list and never mutated. It
//! stores the undirected, simple adjacency in compressed sparse row form so
//! that neighbour slices, degrees and the maximum degree are all O(1) lookups.
//!
//! # Policies
//!
//! - Duplicate edges, in either orientation, are collapsed: the graph is simple.
//! - Self-loops are governed by [`SelfLoopPolicy`]: rejected by default, or
//!   dropped when the caller opts into [`SelfLoopPolicy::Ignore`].

mod index;

pub use index::{GraphIndex, SelfLoopPolicy};
