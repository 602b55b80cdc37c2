//! Runtime hierarchical state machine.
//!
//! The types in this module are what
//! [`MachineBuilder::build`](crate::builder::MachineBuilder::build)
//! assembles: an executable
//! machine over concrete identifier types, its transition edges, the
//! firing history, and the lifecycle errors.

mod error;
mod history;
mod hsm;

pub use error::MachineError;
pub use history::{TransitionHistory, TransitionRecord};
pub use hsm::{HierarchicalStateMachine, MachineTransition};
