//! Core types for the sirnet epidemic engine.
//!
//! Everything in this crate is plain data: node identifiers, compartment
//! statuses, aggregate counts, per-step transitions and the shared error type.
//! Behaviour lives in `sirnet-graph`, `sirnet-engine` and `sirnet-simulation`.

mod error;
mod event;
mod identifiers;
mod status;

pub use error::{Result, SimulationError};
pub use event::{Generation, Transition, Transmission};
pub use identifiers::{Edge, NodeId, Step};
pub use status::{MacroState, NodeStatus, StatusCounts};
