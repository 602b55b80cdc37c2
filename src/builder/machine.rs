//! The authoring model: registries plus assembly.

use std::collections::BTreeMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::{
    behavior_ref, BehaviorRef, EmptyBehavior, FromValue, GuardTemplate, GuardTemplateRef, Kind,
    Value,
};
use crate::machine::HierarchicalStateMachine;
use crate::persist::PersistError;

use super::hierarchy::{HierarchyRegistry, ParentLink};
use super::states::{StateEntry, StateRegistry};
use super::transitions::{TransitionEntry, TransitionRegistry};

/// Authoring-side definition of a hierarchical state machine.
///
/// Owns the declared identifier kinds, the state registry, the hierarchy
/// registry, the transition registry and a JSON-valued metadata store.
/// External collaborators (a graph editor, a loader) mutate the
/// definition incrementally through this surface and read it back through
/// the query operations; every malformed mutation is a silent no-op so
/// interactive editing never sees exception storms.
///
/// # Example
///
/// ```rust
/// use arbor::builder::MachineBuilder;
/// use arbor::core::{Kind, Value};
///
/// let mut builder = MachineBuilder::new(Kind::Str, Kind::Str);
/// builder.add_state(Value::from("closed"), None);
/// builder.add_state(Value::from("open"), None);
/// builder.add_transition(Value::from("closed"), Value::from("knock"), Value::from("open"), &[]);
///
/// let mut machine = builder.build::<String, String>();
/// machine.start().unwrap();
/// assert!(machine.fire(&"knock".to_string()));
/// ```
pub struct MachineBuilder {
    states: StateRegistry,
    trigger_kind: Kind,
    hierarchy: HierarchyRegistry,
    transitions: TransitionRegistry,
    metadata: BTreeMap<String, serde_json::Value>,
}

impl MachineBuilder {
    /// Create an empty definition declared over the two kinds.
    pub fn new(state_kind: Kind, trigger_kind: Kind) -> Self {
        Self {
            states: StateRegistry::new(state_kind),
            trigger_kind,
            hierarchy: HierarchyRegistry::new(),
            transitions: TransitionRegistry::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// The declared state identifier kind.
    pub fn state_kind(&self) -> &Kind {
        self.states.kind()
    }

    /// The declared trigger identifier kind.
    pub fn trigger_kind(&self) -> &Kind {
        &self.trigger_kind
    }

    /// Change the state kind. All typed data is invalidated: states,
    /// hierarchy and transitions are cleared.
    pub fn set_state_kind(&mut self, kind: Kind) {
        self.states.set_kind(kind);
        self.hierarchy.clear();
        self.transitions.clear();
    }

    /// Change the trigger kind, clearing the transition table.
    pub fn set_trigger_kind(&mut self, kind: Kind) {
        self.trigger_kind = kind;
        self.transitions.clear();
    }

    // ---- states -----------------------------------------------------------

    /// Declare a state with an optional behavior object. No-op on kind
    /// mismatch or duplicate id; the first state declared becomes the
    /// initial state.
    pub fn add_state(&mut self, id: Value, behavior: Option<BehaviorRef>) {
        self.states.add(id, behavior);
    }

    /// Remove a state and everything referencing it: transitions with it
    /// as source or target, and its hierarchy membership. If it was the
    /// initial state, the designation moves to a remaining root.
    pub fn remove_state(&mut self, id: &Value) {
        if !self.states.contains(id) {
            return;
        }

        self.transitions.remove_referencing(id);
        self.hierarchy.remove_all_for(id);

        if self.states.remove(id) {
            self.reassign_initial_state();
        }
    }

    /// Designate the initial state. No-op unless declared.
    pub fn set_initial_state(&mut self, id: &Value) {
        self.states.set_initial(id);
    }

    /// The designated initial state.
    pub fn initial_state(&self) -> Option<&Value> {
        self.states.initial()
    }

    /// Whether `id` is declared.
    pub fn contains_state(&self, id: &Value) -> bool {
        self.states.contains(id)
    }

    /// Snapshot of all declared states.
    pub fn states(&self) -> &[StateEntry] {
        self.states.entries()
    }

    /// Number of declared states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    // ---- transitions ------------------------------------------------------

    /// Register a transition with its guard templates. No-op if a kind
    /// mismatches its declared kind, an endpoint is not a declared state,
    /// or the exact triple already exists. The guard list is copied.
    pub fn add_transition(
        &mut self,
        from: Value,
        trigger: Value,
        to: Value,
        guards: &[GuardTemplateRef],
    ) {
        if !from.matches(self.states.kind())
            || !to.matches(self.states.kind())
            || !trigger.matches(&self.trigger_kind)
        {
            trace!(from = ?from, trigger = ?trigger, to = ?to, "transition kind rejected");
            return;
        }
        if !self.states.contains(&from) || !self.states.contains(&to) {
            trace!(from = ?from, to = ?to, "transition endpoint unknown");
            return;
        }
        self.transitions.add(from, trigger, to, guards);
    }

    /// Remove the transition carrying the exact triple.
    pub fn remove_transition(&mut self, from: &Value, trigger: &Value, to: &Value) {
        self.transitions.remove(from, trigger, to);
    }

    /// Whether the triple is registered.
    pub fn contains_transition(&self, from: &Value, trigger: &Value, to: &Value) -> bool {
        self.transitions.contains(from, trigger, to)
    }

    /// All registered transitions.
    pub fn transitions(&self) -> &[TransitionEntry] {
        self.transitions.entries()
    }

    // ---- hierarchy --------------------------------------------------------

    /// Attach `child` under `parent`. No-op unless both are declared
    /// states; self-parenting, reparenting and cycles are rejected.
    /// Nesting the current initial state moves the designation to a
    /// remaining root, keeping the initial state a root.
    pub fn add_child(&mut self, parent: &Value, child: &Value) {
        if !self.states.contains(parent) || !self.states.contains(child) {
            return;
        }
        self.hierarchy.add_child(parent, child);

        if let Some(initial) = self.states.initial() {
            if self.hierarchy.has_parent(initial) {
                self.reassign_initial_state();
            }
        }
    }

    /// Detach `child` from whichever parent holds it.
    pub fn remove_child(&mut self, child: &Value) {
        self.hierarchy.detach(child);
    }

    /// Designate the child entered by default when `parent` is entered.
    pub fn set_initial_child(&mut self, parent: &Value, child: &Value) {
        self.hierarchy.set_initial_child(parent, child);
    }

    /// Children attached under `parent`.
    pub fn children_of(&self, parent: &Value) -> &[Value] {
        self.hierarchy.children_of(parent)
    }

    /// The initial child of `parent`, if it has children.
    pub fn initial_child_of(&self, parent: &Value) -> Option<&Value> {
        self.hierarchy.initial_child_of(parent)
    }

    /// The parent holding `id`, if any.
    pub fn parent_of(&self, id: &Value) -> Option<&Value> {
        self.hierarchy.parent_of(id)
    }

    /// Whether `id` is attached under some parent.
    pub fn has_parent(&self, id: &Value) -> bool {
        self.hierarchy.has_parent(id)
    }

    /// All declared states with no parent.
    pub fn roots(&self) -> Vec<Value> {
        self.hierarchy
            .roots(self.states.entries().iter().map(|e| e.id()))
    }

    /// All parent links, for read-back and persistence.
    pub fn hierarchy_links(&self) -> &[ParentLink] {
        self.hierarchy.links()
    }

    /// Remove every state, hierarchy link and transition, keeping the
    /// declared kinds and the metadata store.
    pub fn clear(&mut self) {
        self.states.clear();
        self.hierarchy.clear();
        self.transitions.clear();
    }

    // ---- metadata ---------------------------------------------------------

    /// Store a JSON-serializable value under `key`, replacing any
    /// previous value.
    pub fn set_metadata<V: Serialize>(&mut self, key: &str, value: &V) -> Result<(), PersistError> {
        let value = serde_json::to_value(value)
            .map_err(|e| PersistError::Serialization(e.to_string()))?;
        self.metadata.insert(key.to_string(), value);
        Ok(())
    }

    /// Read back a metadata value. `None` if the key is missing or the
    /// stored value does not decode as `V`.
    pub fn metadata<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        self.metadata
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Remove the value stored under `key`.
    pub fn remove_metadata(&mut self, key: &str) {
        self.metadata.remove(key);
    }

    /// Whether a value is stored under `key`.
    pub fn contains_metadata_key(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    pub(crate) fn metadata_raw(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    pub(crate) fn set_metadata_raw(&mut self, key: String, value: serde_json::Value) {
        self.metadata.insert(key, value);
    }

    // ---- assembly ---------------------------------------------------------

    /// Assemble a runtime machine over concrete identifier types.
    ///
    /// The entry point is parameterized at the call site once the kinds
    /// are known. Entries whose stored value does not convert to the
    /// requested type are excluded silently, so building with types
    /// mismatched against the declared kinds yields a structurally
    /// incomplete machine rather than an error; callers keep kinds
    /// consistent.
    pub fn build<S, T>(&self) -> HierarchicalStateMachine<S, T>
    where
        S: FromValue + Clone + PartialEq + Debug,
        T: FromValue + Clone + PartialEq + Debug,
    {
        let mut machine = HierarchicalStateMachine::new();

        for entry in self.states.entries() {
            let Some(id) = S::from_value(entry.id()) else {
                trace!(id = ?entry.id(), "state excluded from build");
                continue;
            };
            match entry.behavior() {
                Some(behavior) => {
                    machine.add_state(id.clone(), behavior.clone());
                    machine.subscribe_event_handler_to(&id, behavior.clone());
                }
                None => machine.add_state(id, behavior_ref(EmptyBehavior)),
            }
        }

        if let Some(id) = self.states.initial().and_then(S::from_value) {
            machine.set_initial_state(id);
        }

        for entry in self.transitions.entries() {
            let converted = (
                S::from_value(entry.from()),
                T::from_value(entry.trigger()),
                S::from_value(entry.to()),
            );
            let (Some(from), Some(trigger), Some(to)) = converted else {
                trace!(from = ?entry.from(), to = ?entry.to(), "transition excluded from build");
                continue;
            };

            machine.add_transition(from.clone(), trigger.clone(), to.clone());
            for guard in entry.guards() {
                machine.add_guard_condition_to(&from, &trigger, &to, guard.instantiate());
            }
        }

        for link in self.hierarchy.links() {
            let Some(parent) = S::from_value(link.parent()) else {
                continue;
            };
            for child in link.children() {
                if let Some(child) = S::from_value(child) {
                    machine.add_child_to(&parent, &child);
                }
            }
            if let Some(initial_child) = S::from_value(link.initial_child()) {
                machine.set_initial_child_of(&parent, &initial_child);
            }
        }

        debug!(
            states = machine.state_count(),
            transitions = machine.transitions().len(),
            "machine assembled"
        );
        machine
    }

    fn reassign_initial_state(&mut self) {
        let roots = self.roots();
        if let Some(first) = roots.first() {
            self.states.set_initial(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FnGuard;

    fn id(text: &str) -> Value {
        Value::from(text)
    }

    fn string_builder() -> MachineBuilder {
        MachineBuilder::new(Kind::Str, Kind::Str)
    }

    #[test]
    fn removing_a_state_cascades() {
        let mut builder = string_builder();
        for state in ["a", "b", "c"] {
            builder.add_state(id(state), None);
        }
        builder.add_child(&id("a"), &id("b"));
        builder.add_transition(id("b"), id("go"), id("c"), &[]);
        builder.add_transition(id("c"), id("back"), id("b"), &[]);

        builder.remove_state(&id("b"));

        assert!(!builder.contains_state(&id("b")));
        assert!(builder.transitions().is_empty());
        assert!(builder.children_of(&id("a")).is_empty());
    }

    #[test]
    fn removing_the_initial_state_reassigns_to_a_root() {
        let mut builder = string_builder();
        for state in ["a", "b", "c"] {
            builder.add_state(id(state), None);
        }
        // b is a child; the remaining roots after removing a are b's
        // parentless peers.
        builder.add_child(&id("c"), &id("b"));
        assert_eq!(builder.initial_state(), Some(&id("a")));

        builder.remove_state(&id("a"));
        assert_eq!(builder.initial_state(), Some(&id("c")));
    }

    #[test]
    fn removing_the_last_state_clears_the_initial_designation() {
        let mut builder = string_builder();
        builder.add_state(id("only"), None);

        builder.remove_state(&id("only"));
        assert_eq!(builder.initial_state(), None);
    }

    #[test]
    fn transitions_require_declared_endpoints_and_matching_kinds() {
        let mut builder = MachineBuilder::new(Kind::Str, Kind::Int);
        builder.add_state(id("a"), None);
        builder.add_state(id("b"), None);

        // Wrong trigger kind.
        builder.add_transition(id("a"), id("go"), id("b"), &[]);
        // Unknown target.
        builder.add_transition(id("a"), Value::from(1), id("missing"), &[]);
        // Well formed.
        builder.add_transition(id("a"), Value::from(1), id("b"), &[]);

        assert_eq!(builder.transitions().len(), 1);
    }

    #[test]
    fn changing_the_state_kind_clears_everything_typed() {
        let mut builder = string_builder();
        builder.add_state(id("a"), None);
        builder.add_state(id("b"), None);
        builder.add_child(&id("a"), &id("b"));
        builder.add_transition(id("a"), id("go"), id("b"), &[]);

        builder.set_state_kind(Kind::Int);

        assert_eq!(builder.state_count(), 0);
        assert!(builder.transitions().is_empty());
        assert!(builder.hierarchy_links().is_empty());
        assert_eq!(builder.initial_state(), None);
    }

    #[test]
    fn changing_the_trigger_kind_clears_transitions_only() {
        let mut builder = string_builder();
        builder.add_state(id("a"), None);
        builder.add_state(id("b"), None);
        builder.add_child(&id("a"), &id("b"));
        builder.add_transition(id("a"), id("go"), id("b"), &[]);

        builder.set_trigger_kind(Kind::Int);

        assert_eq!(builder.state_count(), 2);
        assert!(builder.transitions().is_empty());
        assert_eq!(builder.hierarchy_links().len(), 1);
    }

    #[test]
    fn build_assembles_states_transitions_and_hierarchy() {
        let mut builder = string_builder();
        for state in ["a", "b", "c"] {
            builder.add_state(id(state), None);
        }
        builder.add_child(&id("a"), &id("b"));
        builder.add_child(&id("a"), &id("c"));
        builder.add_transition(id("b"), id("go"), id("c"), &[]);

        let mut machine = builder.build::<String, String>();
        assert_eq!(machine.state_count(), 3);
        assert_eq!(machine.transitions().len(), 1);
        assert_eq!(
            machine.initial_child_of(&"a".to_string()),
            Some(&"b".to_string())
        );

        machine.start().unwrap();
        assert_eq!(machine.active_path(), &["a".to_string(), "b".to_string()]);
        assert!(machine.fire(&"go".to_string()));
        assert_eq!(machine.active_leaf(), Some(&"c".to_string()));
    }

    #[test]
    fn build_with_mismatched_types_excludes_entries() {
        let mut builder = string_builder();
        builder.add_state(id("a"), None);
        builder.add_state(id("b"), None);
        builder.add_transition(id("a"), id("go"), id("b"), &[]);

        let machine = builder.build::<i32, String>();
        assert_eq!(machine.state_count(), 0);
        assert!(machine.transitions().is_empty());
        assert_eq!(machine.initial_state(), None);
    }

    #[test]
    fn each_build_gets_fresh_guard_instances() {
        use std::cell::Cell;
        use std::rc::Rc;

        let evaluations = Rc::new(Cell::new(0));
        let probe = Rc::clone(&evaluations);
        let template = FnGuard::new("counting", move || {
            probe.set(probe.get() + 1);
            true
        })
        .shared();

        let mut builder = string_builder();
        builder.add_state(id("a"), None);
        builder.add_state(id("b"), None);
        builder.add_transition(id("a"), id("go"), id("b"), &[template]);

        let mut first = builder.build::<String, String>();
        let mut second = builder.build::<String, String>();

        first.start().unwrap();
        second.start().unwrap();
        assert!(first.fire(&"go".to_string()));
        assert!(second.fire(&"go".to_string()));

        // Both machines evaluated their own instance of the template.
        assert_eq!(evaluations.get(), 2);
        assert_eq!(
            first
                .guard_conditions_of(&"a".to_string(), &"go".to_string(), &"b".to_string())
                .map(|guards| guards.len()),
            Some(1)
        );
    }

    #[test]
    fn metadata_round_trips_json_values() {
        let mut builder = string_builder();
        builder.set_metadata("node.position", &[12.5f32, 40.0]).unwrap();

        assert!(builder.contains_metadata_key("node.position"));
        assert_eq!(
            builder.metadata::<Vec<f32>>("node.position"),
            Some(vec![12.5, 40.0])
        );
        assert_eq!(builder.metadata::<String>("node.position"), None);

        builder.remove_metadata("node.position");
        assert!(!builder.contains_metadata_key("node.position"));
    }
}
