//! Arbor: hierarchical state machine authoring and runtime.
//!
//! Arbor separates a state machine's life into an authoring model and a
//! runtime instance. The authoring side, [`builder::MachineBuilder`], is
//! a permissive, incrementally-edited definition: states carry
//! dynamically-kinded identifiers (integer, float, string or named enum),
//! nest into a single-parent forest, and connect through guarded
//! transitions. The runtime side, [`machine::HierarchicalStateMachine`],
//! is the typed, executable machine the builder assembles: it tracks a
//! root-to-leaf active path, fires triggers against the nearest matching
//! active state, and runs enter/exit/update hooks across hierarchy
//! levels.
//!
//! # Core Concepts
//!
//! - **Identifier values**: dynamically-kinded ids via [`core::Value`],
//!   declared per definition with [`core::Kind`]
//! - **Registries**: states, hierarchy and transitions, mutated through
//!   silent-no-op operations built for interactive editing
//! - **Guards**: named templates instantiated per build, evaluated as a
//!   short-circuiting conjunction at firing time
//! - **Persistence**: definitions round-trip through a serde document
//!   with behaviors and guards re-bound by name
//!
//! # Example
//!
//! ```rust
//! use arbor::builder::MachineBuilder;
//! use arbor::core::{Kind, Value};
//!
//! let mut builder = MachineBuilder::new(Kind::Str, Kind::Str);
//!
//! // A door with a nested "open" region.
//! builder.add_state(Value::from("closed"), None);
//! builder.add_state(Value::from("open"), None);
//! builder.add_state(Value::from("ajar"), None);
//! builder.add_child(&Value::from("open"), &Value::from("ajar"));
//! builder.add_transition(
//!     Value::from("closed"),
//!     Value::from("push"),
//!     Value::from("open"),
//!     &[],
//! );
//!
//! let mut door = builder.build::<String, String>();
//! door.start().unwrap();
//! assert_eq!(door.active_path(), &["closed".to_string()]);
//!
//! assert!(door.fire(&"push".to_string()));
//! // Entering the composite "open" state also enters its initial child.
//! assert_eq!(
//!     door.active_path(),
//!     &["open".to_string(), "ajar".to_string()],
//! );
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod persist;

// Re-export commonly used types
pub use crate::builder::MachineBuilder;
pub use crate::core::{EnumKind, FnGuard, FromValue, Kind, StateBehavior, Value};
pub use crate::machine::{HierarchicalStateMachine, MachineError};
pub use crate::persist::{DefinitionDocument, TemplateCatalog};
