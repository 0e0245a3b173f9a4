//! Synchronous SIR transition engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    TransitionEngine                      │
//! │                                                          │
//! │  GraphIndex (Arc, read-only)   ProbabilityTables (Arc)   │
//! │                  │                      │                │
//! │                  ▼                      ▼                │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  plan(&StateStore, &mut RandomSource)              │  │
//! │  │    reads only the committed snapshot               │  │
//! │  │    -> Vec<Transition>                              │  │
//! │  └────────────────────────┬───────────────────────────┘  │
//! │                           │                              │
//! │                           ▼                              │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  StateStore::commit(transitions)                   │  │
//! │  │    statuses, counters and infected degrees         │  │
//! │  │    change together; step += 1                      │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Planning never writes to the store, so every decision in a step sees the
//! state as it stood when the step began. A failed plan commits nothing.

mod probability;
mod random;
mod store;
mod transition;

pub use probability::ProbabilityTables;
pub use random::{node_stream, RandomSource};
pub use store::StateStore;
pub use transition::{TickMode, TransitionEngine};
