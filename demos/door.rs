//! A string-kinded door machine: nested states, a guarded transition,
//! and behavior hooks.

use std::cell::RefCell;
use std::rc::Rc;

use arbor::builder::MachineBuilder;
use arbor::core::{behavior_ref, FnGuard, Kind, StateBehavior, Value};

struct Announcer(&'static str);

impl StateBehavior for Announcer {
    fn on_enter(&mut self) {
        println!("  -> entered {}", self.0);
    }

    fn on_exit(&mut self) {
        println!("  <- exited {}", self.0);
    }
}

fn main() {
    let locked = Rc::new(RefCell::new(true));

    let mut builder = MachineBuilder::new(Kind::Str, Kind::Str);
    builder.add_state(Value::from("closed"), Some(behavior_ref(Announcer("closed"))));
    builder.add_state(Value::from("open"), Some(behavior_ref(Announcer("open"))));
    builder.add_state(Value::from("ajar"), Some(behavior_ref(Announcer("ajar"))));
    builder.add_state(Value::from("wide"), Some(behavior_ref(Announcer("wide"))));

    // "open" is a composite state; "ajar" is entered first.
    builder.add_child(&Value::from("open"), &Value::from("ajar"));
    builder.add_child(&Value::from("open"), &Value::from("wide"));

    let gate = Rc::clone(&locked);
    builder.add_transition(
        Value::from("closed"),
        Value::from("push"),
        Value::from("open"),
        &[FnGuard::new("unlocked", move || !*gate.borrow()).shared()],
    );
    builder.add_transition(
        Value::from("ajar"),
        Value::from("push"),
        Value::from("wide"),
        &[],
    );

    let mut door = builder.build::<String, String>();
    door.start().expect("definition has an initial state");

    println!("pushing a locked door:");
    println!("  fired: {}", door.fire(&"push".to_string()));

    *locked.borrow_mut() = false;
    println!("pushing an unlocked door:");
    println!("  fired: {}", door.fire(&"push".to_string()));
    println!("  active path: {:?}", door.active_path());

    println!("pushing it wide open:");
    println!("  fired: {}", door.fire(&"push".to_string()));
    println!("  active path: {:?}", door.active_path());
}
