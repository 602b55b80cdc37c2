//! Registry of declared states.

use tracing::trace;

use crate::core::{BehaviorRef, Kind, Value};

/// One declared state: identifier plus optional behavior object.
#[derive(Clone)]
pub struct StateEntry {
    id: Value,
    behavior: Option<BehaviorRef>,
}

impl StateEntry {
    /// The state's identifier.
    pub fn id(&self) -> &Value {
        &self.id
    }

    /// The attached behavior, if any.
    pub fn behavior(&self) -> Option<&BehaviorRef> {
        self.behavior.as_ref()
    }
}

/// Owns the set of declared states and the designated initial state.
///
/// Mutations follow the silent-no-op policy: malformed requests (kind
/// mismatch, duplicate id, unknown id) leave the registry unchanged, and
/// callers detect rejection through the query operations.
pub struct StateRegistry {
    kind: Kind,
    entries: Vec<StateEntry>,
    initial: Option<Value>,
}

impl StateRegistry {
    /// Create an empty registry declared over `kind`.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            initial: None,
        }
    }

    /// The declared identifier kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Replace the declared kind, clearing every entry: a kind change
    /// invalidates all existing typed data.
    pub fn set_kind(&mut self, kind: Kind) {
        self.kind = kind;
        self.clear();
    }

    /// Declare a state. No-op if the id's kind mismatches the declared
    /// kind or the id is already present. The first state added becomes
    /// the initial state.
    pub fn add(&mut self, id: Value, behavior: Option<BehaviorRef>) {
        if !id.matches(&self.kind) || self.contains(&id) {
            trace!(id = ?id, "state rejected");
            return;
        }

        self.entries.push(StateEntry {
            id: id.clone(),
            behavior,
        });

        if self.entries.len() == 1 {
            self.initial = Some(id);
        }
    }

    /// Remove a state if present. Returns whether the removed state was
    /// the initial state, in which case the initial designation has been
    /// cleared and the owner is expected to reassign it.
    pub fn remove(&mut self, id: &Value) -> bool {
        let Some(index) = self.entries.iter().position(|e| &e.id == id) else {
            return false;
        };
        self.entries.remove(index);

        if self.initial.as_ref() == Some(id) {
            self.initial = None;
            return true;
        }
        false
    }

    /// Designate the initial state. No-op unless `id` is present.
    pub fn set_initial(&mut self, id: &Value) {
        if self.contains(id) {
            self.initial = Some(id.clone());
        }
    }

    /// The designated initial state, if any state is declared.
    pub fn initial(&self) -> Option<&Value> {
        self.initial.as_ref()
    }

    /// Whether `id` is declared.
    pub fn contains(&self, id: &Value) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    /// Look up a declared state.
    pub fn get(&self, id: &Value) -> Option<&StateEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Snapshot of all declared states, in declaration order.
    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    /// Number of declared states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no states are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every state and clear the initial designation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.initial = None;
    }
}
