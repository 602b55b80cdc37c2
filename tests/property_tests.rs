//! Property-based tests for the identifier codec and the authoring
//! registries.
//!
//! These tests use proptest to verify the codec round-trip law and the
//! structural invariants of the definition model across many randomly
//! generated inputs.

use arbor::builder::MachineBuilder;
use arbor::core::{codec, EnumKind, Kind, Value};
use proptest::prelude::*;

fn run_kind() -> Kind {
    Kind::Enum(EnumKind::new("Run", [("Start", 0), ("Stop", 1), ("Pause", 4)]))
}

#[derive(Clone, Debug)]
enum Op {
    Add(u8),
    Remove(u8),
    Link(u8, u8),
    Detach(u8),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6u8).prop_map(Op::Add),
        (0..6u8).prop_map(Op::Remove),
        ((0..6u8), (0..6u8)).prop_map(|(parent, child)| Op::Link(parent, child)),
        (0..6u8).prop_map(Op::Detach),
    ]
}

fn apply(builder: &mut MachineBuilder, ops: Vec<Op>) {
    for op in ops {
        match op {
            Op::Add(n) => builder.add_state(Value::from(n as i32), None),
            Op::Remove(n) => builder.remove_state(&Value::from(n as i32)),
            Op::Link(parent, child) => {
                builder.add_child(&Value::from(parent as i32), &Value::from(child as i32))
            }
            Op::Detach(n) => builder.remove_child(&Value::from(n as i32)),
        }
    }
}

proptest! {
    #[test]
    fn int_values_round_trip(raw in any::<i32>()) {
        let value = Value::from(raw);
        let text = codec::serialize(&value);
        prop_assert_eq!(codec::deserialize(&text, &Kind::Int), Ok(value));
    }

    #[test]
    fn float_values_round_trip(raw in prop::num::f32::NORMAL | prop::num::f32::ZERO) {
        let value = Value::from(raw);
        let text = codec::serialize(&value);
        prop_assert_eq!(codec::deserialize(&text, &Kind::Float), Ok(value));
    }

    #[test]
    fn string_values_round_trip(raw in ".*") {
        let value = Value::from(raw.as_str());
        let text = codec::serialize(&value);
        prop_assert_eq!(codec::deserialize(&text, &Kind::Str), Ok(value));
    }

    #[test]
    fn enum_values_round_trip_or_fall_back_to_zero(raw in any::<i32>()) {
        let kind = run_kind();
        let value = Value::enumerated("Run", raw);
        let text = codec::serialize(&value);
        let decoded = codec::deserialize(&text, &kind).unwrap();

        let expected = if matches!(raw, 0 | 1 | 4) { raw } else { 0 };
        prop_assert_eq!(decoded, Value::enumerated("Run", expected));
    }

    #[test]
    fn hierarchy_links_never_create_cycles(ops in prop::collection::vec(arbitrary_op(), 0..48)) {
        let mut builder = MachineBuilder::new(Kind::Int, Kind::Int);
        apply(&mut builder, ops);

        // Every parent chain must terminate without revisiting a state.
        for entry in builder.states() {
            let mut steps = 0;
            let mut current = entry.id().clone();
            while let Some(parent) = builder.parent_of(&current) {
                current = parent.clone();
                steps += 1;
                prop_assert!(steps <= builder.state_count(), "parent chain loops");
            }
        }
    }

    #[test]
    fn the_initial_state_is_always_a_registered_root(
        ops in prop::collection::vec(arbitrary_op(), 0..48)
    ) {
        let mut builder = MachineBuilder::new(Kind::Int, Kind::Int);
        apply(&mut builder, ops);

        match builder.initial_state() {
            None => prop_assert_eq!(builder.state_count(), 0),
            Some(initial) => {
                prop_assert!(builder.contains_state(initial));
                prop_assert!(!builder.has_parent(initial));
            }
        }
    }

    #[test]
    fn each_parent_keeps_exactly_one_initial_child(
        ops in prop::collection::vec(arbitrary_op(), 0..48)
    ) {
        let mut builder = MachineBuilder::new(Kind::Int, Kind::Int);
        apply(&mut builder, ops);

        for link in builder.hierarchy_links() {
            prop_assert!(!link.children().is_empty());
            prop_assert!(link.children().contains(link.initial_child()));
        }
    }

    #[test]
    fn re_adding_a_transition_triple_leaves_one_entry(times in 1..6usize) {
        let mut builder = MachineBuilder::new(Kind::Str, Kind::Str);
        builder.add_state(Value::from("a"), None);
        builder.add_state(Value::from("b"), None);

        for _ in 0..times {
            builder.add_transition(
                Value::from("a"),
                Value::from("go"),
                Value::from("b"),
                &[],
            );
        }
        prop_assert_eq!(builder.transitions().len(), 1);
    }
}
