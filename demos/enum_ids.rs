//! Enum-kinded identifiers and a definition round-trip through JSON.

use arbor::builder::MachineBuilder;
use arbor::core::{Kind, Value};
use arbor::id_enum;
use arbor::persist::TemplateCatalog;

id_enum! {
    pub enum Mode {
        Idle = 0,
        Working = 1,
        Cooldown = 2,
    }
}

id_enum! {
    pub enum Command {
        Begin = 0,
        Finish = 1,
    }
}

fn main() {
    let mut builder = MachineBuilder::new(Kind::Enum(Mode::kind()), Kind::Enum(Command::kind()));
    builder.add_state(Value::from(Mode::Idle), None);
    builder.add_state(Value::from(Mode::Working), None);
    builder.add_state(Value::from(Mode::Cooldown), None);
    builder.add_transition(
        Value::from(Mode::Idle),
        Value::from(Command::Begin),
        Value::from(Mode::Working),
        &[],
    );
    builder.add_transition(
        Value::from(Mode::Working),
        Value::from(Command::Finish),
        Value::from(Mode::Cooldown),
        &[],
    );

    let json = builder
        .to_document()
        .to_json()
        .expect("document serializes");
    println!("persisted definition:\n{json}\n");

    let document = arbor::DefinitionDocument::from_json(&json).expect("document parses");
    let loaded = MachineBuilder::from_document(&document, &TemplateCatalog::new())
        .expect("kinds resolve from the embedded enum table");

    let mut machine = loaded.build::<Mode, Command>();
    machine.start().expect("initial state loaded");

    println!("active: {:?}", machine.active_leaf());
    machine.fire(&Command::Begin);
    println!("after Begin: {:?}", machine.active_leaf());
    machine.fire(&Command::Finish);
    println!("after Finish: {:?}", machine.active_leaf());
}
