//! Property tests for value binding and array parsing.

use argbind_core::prelude::*;
use argbind_core::{TokenCursor, TypeRegistry};
use proptest::prelude::*;

#[derive(Debug, Default, PartialEq)]
struct Typed {
    text: Option<String>,
    small: Option<i8>,
    wide: Option<i64>,
    ratio: Option<f64>,
    switch: Option<bool>,
    flag: bool,
}

impl Args for Typed {
    fn program_info(&self) -> &str {
        "Typed values."
    }

    fn arguments() -> ArgumentTable<Self> {
        ArgumentTable::<Self>::new()
            .value::<String, _>(Argument::new("text", "text"), |t, v| t.text = Some(v))
            .value::<i8, _>(Argument::new("small", "small"), |t, v| t.small = Some(v))
            .value::<i64, _>(Argument::new("wide", "wide"), |t, v| t.wide = Some(v))
            .value::<f64, _>(Argument::new("ratio", "ratio"), |t, v| t.ratio = Some(v))
            .value::<bool, _>(Argument::new("switch", "switch"), |t, v| t.switch = Some(v))
            .flag(Argument::new("flag", "flag"), |t| &mut t.flag)
    }
}

fn parse_array<T: 'static>(token: Option<String>) -> Vec<T> {
    let registry = TypeRegistry::with_defaults();
    let tokens: Vec<String> = token.into_iter().collect();
    let mut cursor = TokenCursor::new(&tokens);
    registry
        .parse_as::<Vec<T>>(";", &mut cursor)
        .unwrap_or_else(|| panic!("array parser registered"))
        .unwrap_or_else(|e| panic!("array parses: {e}"))
}

fn value_text() -> impl Strategy<Value = String> {
    // Values must not look like identifiers or contain the delimiter.
    "[a-zA-Z0-9 ._]{1,12}"
}

proptest! {
    #[test]
    fn typed_values_bind_in_input_order(
        text in value_text(),
        small in any::<i8>(),
        wide in any::<i64>(),
        ratio in -1.0e9f64..1.0e9,
        flag in any::<bool>(),
        order in Just(vec!["text", "small", "wide", "ratio", "switch"]).prop_shuffle(),
    ) {
        let mut tokens = Vec::new();
        for name in &order {
            tokens.push(format!("-{name}"));
            // The switch is a bool and takes no value token.
            let value = match *name {
                "text" => text.clone(),
                "small" => small.to_string(),
                "wide" => wide.to_string(),
                "ratio" => ratio.to_string(),
                _ => continue,
            };
            tokens.push(value);
        }
        let mut expected_order: Vec<String> = order.iter().map(|n| n.to_string()).collect();
        if flag {
            tokens.push("-flag".to_string());
            expected_order.push("flag".to_string());
        }

        let parsed = ArgsParser::new().try_parse::<Typed, _, _>(&tokens).unwrap();
        prop_assert_eq!(parsed.outcome.supplied, expected_order);
        prop_assert_eq!(
            parsed.target,
            Typed {
                text: Some(text),
                small: Some(small),
                wide: Some(wide),
                ratio: Some(ratio),
                switch: Some(true),
                flag,
            }
        );
    }

    #[test]
    fn flags_consume_exactly_one_token(
        name in prop_oneof![Just("flag"), Just("switch")],
        count in 1usize..5,
    ) {
        let mut tokens: Vec<String> = std::iter::repeat(format!("-{name}")).take(count).collect();
        tokens.extend(["-small".to_string(), "7".to_string()]);
        let parsed = ArgsParser::new().try_parse::<Typed, _, _>(&tokens).unwrap();
        prop_assert!(parsed.target.flag || parsed.target.switch == Some(true));
        prop_assert_eq!(parsed.target.small, Some(7));
        prop_assert_eq!(parsed.outcome.supplied.len(), count + 1);
    }

    #[test]
    fn integer_arrays_round_trip(values in proptest::collection::vec(any::<i32>(), 3)) {
        let token = values.iter().map(i32::to_string).collect::<Vec<_>>().join(";");
        prop_assert_eq!(parse_array::<i32>(Some(token)), values);
    }

    #[test]
    fn string_arrays_round_trip(values in proptest::collection::vec(value_text(), 3)) {
        prop_assert_eq!(parse_array::<String>(Some(values.join(";"))), values);
    }

    #[test]
    fn float_arrays_round_trip(values in proptest::collection::vec(-1.0e6f32..1.0e6, 3)) {
        let token = values.iter().map(f32::to_string).collect::<Vec<_>>().join(";");
        prop_assert_eq!(parse_array::<f32>(Some(token)), values);
    }

    #[test]
    fn char_arrays_round_trip(
        values in proptest::collection::vec(proptest::char::range('a', 'z'), 3),
    ) {
        let token = values.iter().map(char::to_string).collect::<Vec<_>>().join(";");
        prop_assert_eq!(parse_array::<char>(Some(token)), values);
    }
}

#[test]
fn every_default_array_is_empty_without_a_token() {
    assert!(parse_array::<String>(None).is_empty());
    assert!(parse_array::<i8>(None).is_empty());
    assert!(parse_array::<i16>(None).is_empty());
    assert!(parse_array::<i32>(None).is_empty());
    assert!(parse_array::<i64>(None).is_empty());
    assert!(parse_array::<u8>(None).is_empty());
    assert!(parse_array::<u16>(None).is_empty());
    assert!(parse_array::<u32>(None).is_empty());
    assert!(parse_array::<u64>(None).is_empty());
    assert!(parse_array::<f32>(None).is_empty());
    assert!(parse_array::<f64>(None).is_empty());
    assert!(parse_array::<bool>(None).is_empty());
    assert!(parse_array::<char>(None).is_empty());
}
