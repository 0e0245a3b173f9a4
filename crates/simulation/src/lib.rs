//! Discrete-time SIR simulation on a static contact network.
//!
//! Given the same edge list, probabilities, seed nodes and generator seed, a
//! [`DiscreteSir`] produces identical results every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     DiscreteSir<R>                      │
//! │                                                         │
//! │  infect_node_set / infect_fraction ──► StateStore       │
//! │                                          ▲              │
//! │  evolve(steps)                           │ commit       │
//! │    └─ per step ──► TransitionEngine ─────┘              │
//! │                      │ plan (snapshot)                  │
//! │                      ▼                                  │
//! │                 RandomSource (R)                        │
//! │                                                         │
//! │  History (opt-in): macro states, transmission tree      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use sirnet_simulation::DiscreteSir;
//! use sirnet_types::NodeId;
//! use std::collections::BTreeSet;
//!
//! let ring = [(0, 1), (1, 2), (2, 3), (3, 0)].map(|(a, b)| (NodeId(a), NodeId(b)));
//! let mut sir = DiscreteSir::new(&ring, 1.0, vec![0.0, 1.0, 1.0]).unwrap();
//!
//! sir.infect_node_set(&BTreeSet::from([NodeId(0)])).unwrap();
//! sir.evolve(1).unwrap();
//! assert_eq!(sir.get_current_macro_state().sir(), (1, 2, 1));
//! ```

mod config;
mod controller;
mod history;

pub use config::{RecordingOptions, SimulationConfig};
pub use controller::DiscreteSir;
pub use history::History;

pub use sirnet_engine::{ProbabilityTables, RandomSource, TickMode};
pub use sirnet_graph::{GraphIndex, SelfLoopPolicy};
