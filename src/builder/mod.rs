//! Authoring model for hierarchical state machine definitions.
//!
//! A definition is edited incrementally through [`MachineBuilder`]: the
//! state registry declares identifiers and behaviors, the hierarchy
//! registry nests them, the transition registry wires guarded edges
//! between them, and [`MachineBuilder::build`] assembles the whole into a
//! runtime [`HierarchicalStateMachine`](crate::machine::HierarchicalStateMachine).
//!
//! Mutations are deliberately permissive: invalid requests are silent
//! no-ops rather than errors, which keeps interactive, UI-driven editing
//! resilient to transient invalid states. Callers verify outcomes through
//! the query operations.

pub mod hierarchy;
pub mod machine;
pub mod macros;
pub mod states;
pub mod transitions;

pub use hierarchy::{HierarchyRegistry, ParentLink};
pub use machine::MachineBuilder;
pub use states::{StateEntry, StateRegistry};
pub use transitions::{TransitionEntry, TransitionRegistry};
