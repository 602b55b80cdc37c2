//! The runtime hierarchical state machine.

use std::any::Any;
use std::fmt::Debug;

use chrono::Utc;
use tracing::{debug, trace};

use crate::core::{BehaviorRef, GuardCondition};

use super::error::MachineError;
use super::history::{TransitionHistory, TransitionRecord};

/// A runtime transition edge with its own guard instances.
pub struct MachineTransition<S, T> {
    from: S,
    trigger: T,
    to: S,
    guards: Vec<Box<dyn GuardCondition>>,
}

impl<S, T> MachineTransition<S, T> {
    /// Source state identifier.
    pub fn from(&self) -> &S {
        &self.from
    }

    /// Trigger identifier.
    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    /// Target state identifier.
    pub fn to(&self) -> &S {
        &self.to
    }

    /// Guard instances attached to this edge.
    pub fn guards(&self) -> &[Box<dyn GuardCondition>] {
        &self.guards
    }
}

struct StateNode<S> {
    id: S,
    behavior: BehaviorRef,
    handlers: Vec<BehaviorRef>,
    parent: Option<S>,
    children: Vec<S>,
    initial_child: Option<S>,
}

/// An executable hierarchical state machine.
///
/// States form a forest; the active configuration is a path from a root
/// down to a leaf. Entering a composite state recursively enters its
/// initial child until a leaf is reached; exiting runs innermost-first.
/// Triggers fired against the machine match transitions from the active
/// leaf or its active ancestors (nearest ancestor first, registration
/// order as the tie-break), gated by their guards.
///
/// The machine is assembled by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build) and
/// driven synchronously by its owning application: one `fire`/`update`
/// call completes fully before the next is accepted.
///
/// # Example
///
/// ```rust
/// use arbor::machine::HierarchicalStateMachine;
/// use arbor::core::{behavior_ref, EmptyBehavior};
///
/// let mut machine: HierarchicalStateMachine<&str, &str> = HierarchicalStateMachine::new();
/// machine.add_state("closed", behavior_ref(EmptyBehavior));
/// machine.add_state("open", behavior_ref(EmptyBehavior));
/// machine.set_initial_state("closed");
/// machine.add_transition("closed", "open_door", "open");
///
/// machine.start().unwrap();
/// assert!(machine.fire(&"open_door"));
/// assert_eq!(machine.active_leaf(), Some(&"open"));
/// ```
pub struct HierarchicalStateMachine<S, T> {
    states: Vec<StateNode<S>>,
    transitions: Vec<MachineTransition<S, T>>,
    initial_state: Option<S>,
    active: Vec<S>,
    history: TransitionHistory<S, T>,
    started: bool,
}

impl<S, T> Default for HierarchicalStateMachine<S, T>
where
    S: Clone + PartialEq + Debug,
    T: Clone + PartialEq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> HierarchicalStateMachine<S, T>
where
    S: Clone + PartialEq + Debug,
    T: Clone + PartialEq + Debug,
{
    /// Create an empty machine.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            initial_state: None,
            active: Vec::new(),
            history: TransitionHistory::new(),
            started: false,
        }
    }

    // ---- assembly surface -------------------------------------------------
    //
    // Mutations follow the same silent-no-op policy as the authoring
    // registries, and are ignored entirely once the machine is started.

    /// Register a state with its behavior object.
    pub fn add_state(&mut self, id: S, behavior: BehaviorRef) {
        if self.started || self.contains_state(&id) {
            return;
        }
        self.states.push(StateNode {
            id,
            behavior,
            handlers: Vec::new(),
            parent: None,
            children: Vec::new(),
            initial_child: None,
        });
    }

    /// Designate the machine's initial state. No-op unless registered.
    pub fn set_initial_state(&mut self, id: S) {
        if self.started || !self.contains_state(&id) {
            return;
        }
        self.initial_state = Some(id);
    }

    /// Subscribe a handler for event dispatch while `id` is active.
    pub fn subscribe_event_handler_to(&mut self, id: &S, handler: BehaviorRef) {
        if self.started {
            return;
        }
        if let Some(index) = self.node_index(id) {
            self.states[index].handlers.push(handler);
        }
    }

    /// Register a transition edge. No-op unless both endpoint states are
    /// registered and the `(from, trigger, to)` triple is new.
    pub fn add_transition(&mut self, from: S, trigger: T, to: S) {
        if self.started
            || !self.contains_state(&from)
            || !self.contains_state(&to)
            || self.transition_index(&from, &trigger, &to).is_some()
        {
            return;
        }
        self.transitions.push(MachineTransition {
            from,
            trigger,
            to,
            guards: Vec::new(),
        });
    }

    /// Attach a guard instance to the edge carrying the triple.
    pub fn add_guard_condition_to(&mut self, from: &S, trigger: &T, to: &S, guard: Box<dyn GuardCondition>) {
        if self.started {
            return;
        }
        if let Some(index) = self.transition_index(from, trigger, to) {
            self.transitions[index].guards.push(guard);
        }
    }

    /// Link `child` under `parent`. Same rejection rules as the authoring
    /// hierarchy: both states registered, no self-parenting, no
    /// reparenting, no cycles. The first child becomes the initial child.
    pub fn add_child_to(&mut self, parent: &S, child: &S) {
        if self.started
            || parent == child
            || self.node_index(parent).is_none()
            || self.is_descendant_of(parent, child)
        {
            return;
        }
        let Some(child_index) = self.node_index(child) else {
            return;
        };
        if self.states[child_index].parent.is_some() {
            return;
        }

        self.states[child_index].parent = Some(parent.clone());

        // node_index(parent) checked above
        if let Some(parent_index) = self.node_index(parent) {
            let node = &mut self.states[parent_index];
            node.children.push(child.clone());
            if node.children.len() == 1 {
                node.initial_child = Some(child.clone());
            }
        }
    }

    /// Designate the child entered by default when `parent` is entered.
    /// No-op unless `child` is linked under `parent`.
    pub fn set_initial_child_of(&mut self, parent: &S, child: &S) {
        if self.started {
            return;
        }
        if let Some(index) = self.node_index(parent) {
            if self.states[index].children.contains(child) {
                self.states[index].initial_child = Some(child.clone());
            }
        }
    }

    // ---- lifecycle --------------------------------------------------------

    /// Enter the initial state's path, expanding initial children down to
    /// a leaf.
    pub fn start(&mut self) -> Result<(), MachineError> {
        if self.started {
            return Err(MachineError::AlreadyStarted);
        }
        let initial = self
            .initial_state
            .clone()
            .ok_or(MachineError::NoInitialState)?;

        debug!(initial = ?initial, "starting machine");

        for id in self.path_of(&initial) {
            self.enter(id);
        }
        self.expand_initial_children(&initial);
        self.started = true;
        Ok(())
    }

    /// Exit every active state, innermost first. No-op if not started.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        while let Some(id) = self.active.last().cloned() {
            self.exit(&id);
        }
        self.started = false;
    }

    /// Whether the machine has been started and not stopped.
    pub fn is_started(&self) -> bool {
        self.started
    }

    // ---- execution --------------------------------------------------------

    /// Fire a trigger against the active configuration.
    ///
    /// Candidates are scanned from the active leaf up through its active
    /// ancestors; within one level the first registered transition whose
    /// guards all pass wins. Returns whether a transition fired.
    pub fn fire(&mut self, trigger: &T) -> bool {
        if !self.started {
            return false;
        }

        for depth in (0..self.active.len()).rev() {
            let from = self.active[depth].clone();

            for index in 0..self.transitions.len() {
                if self.transitions[index].from != from
                    || &self.transitions[index].trigger != trigger
                {
                    continue;
                }
                if self.transitions[index]
                    .guards
                    .iter_mut()
                    .all(|guard| guard.is_satisfied())
                {
                    self.perform(index);
                    return true;
                }
            }
        }

        trace!(trigger = ?trigger, "no transition fired");
        false
    }

    /// Invoke `on_update` along the active path, root to leaf.
    pub fn update(&mut self) {
        if !self.started {
            return;
        }
        for id in self.active.clone() {
            if let Some(behavior) = self.behavior_of(&id) {
                behavior.borrow_mut().on_update();
            }
        }
    }

    /// Dispatch an application event to the subscribed handlers of the
    /// active states, innermost first. Dispatch stops at the first
    /// handler reporting the event handled; returns whether any did.
    pub fn send_event(&mut self, event: &dyn Any) -> bool {
        if !self.started {
            return false;
        }
        for id in self.active.clone().iter().rev() {
            let Some(index) = self.node_index(id) else {
                continue;
            };
            for handler in self.states[index].handlers.clone() {
                if handler.borrow_mut().handle_event(event) {
                    trace!(state = ?id, "event handled");
                    return true;
                }
            }
        }
        false
    }

    // ---- queries ----------------------------------------------------------

    /// All registered state identifiers, in registration order.
    pub fn states(&self) -> Vec<&S> {
        self.states.iter().map(|node| &node.id).collect()
    }

    /// Number of registered states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Whether `id` is registered.
    pub fn contains_state(&self, id: &S) -> bool {
        self.node_index(id).is_some()
    }

    /// The designated initial state.
    pub fn initial_state(&self) -> Option<&S> {
        self.initial_state.as_ref()
    }

    /// The active root-to-leaf path. Empty unless started.
    pub fn active_path(&self) -> &[S] {
        &self.active
    }

    /// The innermost active state. `None` unless started.
    pub fn active_leaf(&self) -> Option<&S> {
        self.active.last()
    }

    /// All transition edges, in registration order.
    pub fn transitions(&self) -> &[MachineTransition<S, T>] {
        &self.transitions
    }

    /// The children linked under `id`, in link order.
    pub fn immediate_children_of(&self, id: &S) -> &[S] {
        self.node_index(id)
            .map(|index| self.states[index].children.as_slice())
            .unwrap_or(&[])
    }

    /// The initial child of `id`, if it has children.
    pub fn initial_child_of(&self, id: &S) -> Option<&S> {
        self.node_index(id)
            .and_then(|index| self.states[index].initial_child.as_ref())
    }

    /// Guard instances of the edge carrying the triple, if registered.
    pub fn guard_conditions_of(&self, from: &S, trigger: &T, to: &S) -> Option<&[Box<dyn GuardCondition>]> {
        self.transition_index(from, trigger, to)
            .map(|index| self.transitions[index].guards.as_slice())
    }

    /// Event handlers subscribed to `id`.
    pub fn event_handlers_of(&self, id: &S) -> &[BehaviorRef] {
        self.node_index(id)
            .map(|index| self.states[index].handlers.as_slice())
            .unwrap_or(&[])
    }

    /// History of fired transitions.
    pub fn history(&self) -> &TransitionHistory<S, T> {
        &self.history
    }

    // ---- internals --------------------------------------------------------

    fn perform(&mut self, index: usize) {
        let source = self.transitions[index].from.clone();
        let trigger = self.transitions[index].trigger.clone();
        let target = self.transitions[index].to.clone();

        let Some(leaf) = self.active.last().cloned() else {
            return;
        };

        debug!(from = ?source, trigger = ?trigger, to = ?target, "firing transition");

        let target_path = self.path_of(&target);

        // Depth of the lowest common ancestor of the active leaf and the
        // target: the longest shared prefix of the two root paths.
        let mut lca = 0;
        while lca < self.active.len()
            && lca < target_path.len()
            && self.active[lca] == target_path[lca]
        {
            lca += 1;
        }

        while self.active.len() > lca {
            if let Some(id) = self.active.last().cloned() {
                self.exit(&id);
            }
        }
        for id in target_path.into_iter().skip(lca) {
            self.enter(id);
        }
        self.expand_initial_children(&target);

        self.history = self.history.record(TransitionRecord {
            from: leaf,
            trigger,
            to: target,
            timestamp: Utc::now(),
        });
    }

    fn enter(&mut self, id: S) {
        trace!(state = ?id, "enter");
        let behavior = self.behavior_of(&id);
        self.active.push(id);
        if let Some(behavior) = behavior {
            behavior.borrow_mut().on_enter();
        }
    }

    fn exit(&mut self, id: &S) {
        trace!(state = ?id, "exit");
        if self.active.last() == Some(id) {
            self.active.pop();
        }
        if let Some(behavior) = self.behavior_of(id) {
            behavior.borrow_mut().on_exit();
        }
    }

    fn expand_initial_children(&mut self, from: &S) {
        let mut current = from.clone();
        while let Some(child) = self.initial_child_of(&current).cloned() {
            self.enter(child.clone());
            current = child;
        }
    }

    /// Root-to-`id` path following parent links.
    fn path_of(&self, id: &S) -> Vec<S> {
        let mut path = vec![id.clone()];
        let mut current = id.clone();
        while let Some(parent) = self.parent_of(&current) {
            path.push(parent.clone());
            current = parent.clone();
        }
        path.reverse();
        path
    }

    fn parent_of(&self, id: &S) -> Option<&S> {
        self.node_index(id)
            .and_then(|index| self.states[index].parent.as_ref())
    }

    fn is_descendant_of(&self, id: &S, ancestor: &S) -> bool {
        let mut pending: Vec<S> = self.immediate_children_of(ancestor).to_vec();
        while let Some(current) = pending.pop() {
            if &current == id {
                return true;
            }
            pending.extend(self.immediate_children_of(&current).iter().cloned());
        }
        false
    }

    fn behavior_of(&self, id: &S) -> Option<BehaviorRef> {
        self.node_index(id)
            .map(|index| self.states[index].behavior.clone())
    }

    fn node_index(&self, id: &S) -> Option<usize> {
        self.states.iter().position(|node| &node.id == id)
    }

    fn transition_index(&self, from: &S, trigger: &T, to: &S) -> Option<usize> {
        self.transitions
            .iter()
            .position(|t| &t.from == from && &t.trigger == trigger && &t.to == to)
    }
}
