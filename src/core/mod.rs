//! Core identifier, behavior and guard types.
//!
//! This module contains the building blocks shared by the authoring model
//! and the runtime machine:
//! - Dynamically-kinded identifier values (`Value`, `Kind`, `EnumKind`)
//! - The canonical text codec for persisted identifiers
//! - Per-state behavior objects (`StateBehavior`)
//! - Guard templates and their evaluation instances
//!
//! Everything here is synchronous and side-effect free apart from the
//! behavior hooks themselves.

mod behavior;
pub mod codec;
mod guard;
mod value;

pub use behavior::{behavior_ref, BehaviorRef, EmptyBehavior, StateBehavior};
pub use codec::CodecError;
pub use guard::{FnGuard, GuardCondition, GuardTemplate, GuardTemplateRef};
pub use value::{EnumKind, EnumMember, FromValue, Kind, Value};
