//! Registry of transitions and their guard templates.

use crate::core::{GuardTemplateRef, Value};

/// One authored transition: `(from, trigger, to)` plus guard templates.
#[derive(Clone)]
pub struct TransitionEntry {
    from: Value,
    trigger: Value,
    to: Value,
    guards: Vec<GuardTemplateRef>,
}

impl TransitionEntry {
    /// Source state identifier.
    pub fn from(&self) -> &Value {
        &self.from
    }

    /// Trigger identifier.
    pub fn trigger(&self) -> &Value {
        &self.trigger
    }

    /// Target state identifier.
    pub fn to(&self) -> &Value {
        &self.to
    }

    /// Guard templates attached to this transition, in attachment order.
    pub fn guards(&self) -> &[GuardTemplateRef] {
        &self.guards
    }

    /// Whether this entry carries the given triple.
    pub fn matches(&self, from: &Value, trigger: &Value, to: &Value) -> bool {
        &self.from == from && &self.trigger == trigger && &self.to == to
    }
}

/// Owns the set of transitions. Transitions are unique by their
/// `(from, trigger, to)` triple; re-adding an existing triple is a no-op.
#[derive(Default)]
pub struct TransitionRegistry {
    entries: Vec<TransitionEntry>,
}

impl TransitionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transition. The guard list is copied at add time, so later
    /// mutation of the source slice does not affect the stored entry.
    pub fn add(&mut self, from: Value, trigger: Value, to: Value, guards: &[GuardTemplateRef]) {
        if self.contains(&from, &trigger, &to) {
            return;
        }

        self.entries.push(TransitionEntry {
            from,
            trigger,
            to,
            guards: guards.to_vec(),
        });
    }

    /// Whether the triple is registered.
    pub fn contains(&self, from: &Value, trigger: &Value, to: &Value) -> bool {
        self.entries.iter().any(|e| e.matches(from, trigger, to))
    }

    /// Remove the transition carrying the triple, if registered.
    pub fn remove(&mut self, from: &Value, trigger: &Value, to: &Value) {
        self.entries.retain(|e| !e.matches(from, trigger, to));
    }

    /// Remove every transition referencing `id` as source or target.
    pub fn remove_referencing(&mut self, id: &Value) {
        self.entries.retain(|e| &e.from != id && &e.to != id);
    }

    /// All transitions, in registration order.
    pub fn entries(&self) -> &[TransitionEntry] {
        &self.entries
    }

    /// Number of registered transitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no transitions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every transition.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
