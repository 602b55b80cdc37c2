//! Re-binding catalog for behaviors and guard templates.
//!
//! Behavior objects and guard templates cannot be serialized; a document
//! stores their names, and loading re-binds the names against whatever
//! the application has registered here. An unresolvable name degrades the
//! loaded entity (behavior-less state, guard-less transition) instead of
//! failing the load.

use crate::core::{BehaviorRef, GuardTemplate, GuardTemplateRef};

/// Named registrations used when loading a definition document.
#[derive(Default)]
pub struct TemplateCatalog {
    behaviors: Vec<(String, BehaviorRef)>,
    guards: Vec<GuardTemplateRef>,
}

impl TemplateCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a behavior under a name. The last registration of a name
    /// wins.
    pub fn register_behavior<N: Into<String>>(&mut self, name: N, behavior: BehaviorRef) {
        self.behaviors.push((name.into(), behavior));
    }

    /// Register a guard template under its own name.
    pub fn register_guard(&mut self, template: GuardTemplateRef) {
        self.guards.push(template);
    }

    /// Look up a behavior by name.
    pub fn behavior(&self, name: &str) -> Option<BehaviorRef> {
        self.behaviors
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b.clone())
    }

    /// Look up a guard template by name.
    pub fn guard(&self, name: &str) -> Option<GuardTemplateRef> {
        self.guards
            .iter()
            .rev()
            .find(|t| t.name() == name)
            .cloned()
    }
}
