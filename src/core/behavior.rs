//! Per-state behavior objects.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Behavior attached to a state.
///
/// The runtime machine invokes the hooks at the corresponding lifecycle
/// points: `on_enter` when the state becomes active, `on_exit` when it is
/// left, `on_update` on every machine update while active. `handle_event`
/// receives application-defined events and reports whether the event was
/// consumed; the default implementation leaves every event unhandled.
///
/// All hooks default to no-ops, so implementors override only what they
/// need.
pub trait StateBehavior {
    /// Display name used when persisting and re-binding behaviors.
    fn name(&self) -> &str {
        ""
    }

    /// Invoked when the owning state is entered.
    fn on_enter(&mut self) {}

    /// Invoked when the owning state is exited.
    fn on_exit(&mut self) {}

    /// Invoked on every update while the owning state is active.
    fn on_update(&mut self) {}

    /// Handle an application-defined event. Return `true` to mark the
    /// event consumed and stop further dispatch.
    fn handle_event(&mut self, _event: &dyn Any) -> bool {
        false
    }
}

/// Shared handle to a behavior object.
///
/// Behaviors are owned by the application and may be attached to several
/// states; the model is single-threaded, so `Rc<RefCell<_>>` is the
/// ownership form.
pub type BehaviorRef = Rc<RefCell<dyn StateBehavior>>;

/// The default behavior attached to states registered without one.
///
/// Unlike supplied behaviors, it is never subscribed for event dispatch.
pub struct EmptyBehavior;

impl StateBehavior for EmptyBehavior {}

/// Wrap a behavior into a shared handle.
pub fn behavior_ref<B: StateBehavior + 'static>(behavior: B) -> BehaviorRef {
    Rc::new(RefCell::new(behavior))
}
