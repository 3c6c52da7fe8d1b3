//! Property tests for option merging and pipeline folding
//!
//! - Merge: idempotence, identity, overlay precedence, key union
//! - Pipeline: when every step succeeds, the output is the left fold of the
//!   steps and there is one detail per step

use proptest::prelude::*;
use serde_json::{Map, Value};

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", json_value(), 0..5)
        .prop_map(|map| Value::Object(map.into_iter().collect::<Map<_, _>>()))
}

mod merge_laws {
    use super::*;
    use submarin_converter::merge::{merge, merge_optional};

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: merging a value onto itself changes nothing
        #[test]
        fn prop_merge_is_idempotent(value in json_value()) {
            prop_assert_eq!(merge(&value, &value), value);
        }

        /// Property: an empty object or a missing overlay keeps the base
        #[test]
        fn prop_empty_overlay_is_identity(base in json_object()) {
            prop_assert_eq!(merge(&base, &Value::Object(Map::new())), base.clone());
            prop_assert_eq!(merge_optional(&base, None), base);
        }

        /// Property: a non-object overlay replaces the base wholesale
        #[test]
        fn prop_leaf_overlay_replaces(base in json_value(), overlay in json_leaf()) {
            prop_assert_eq!(merge(&base, &overlay), overlay);
        }

        /// Property: merged objects hold the union of keys, and overlay
        /// values win unless both sides are objects
        #[test]
        fn prop_object_merge_keys_and_precedence(base in json_object(), overlay in json_object()) {
            let merged = merge(&base, &overlay);
            let merged = merged.as_object().unwrap();
            let base = base.as_object().unwrap();
            let overlay = overlay.as_object().unwrap();

            for key in base.keys().chain(overlay.keys()) {
                prop_assert!(merged.contains_key(key));
            }
            prop_assert!(merged.keys().all(|k| base.contains_key(k) || overlay.contains_key(k)));

            for (key, overlay_value) in overlay {
                match (base.get(key), overlay_value) {
                    (Some(Value::Object(_)), Value::Object(_)) => {
                        prop_assert!(merged[key].is_object());
                    }
                    _ => prop_assert_eq!(&merged[key], overlay_value),
                }
            }
            for (key, base_value) in base {
                if !overlay.contains_key(key) {
                    prop_assert_eq!(&merged[key], base_value);
                }
            }
        }
    }
}

mod pipeline_fold {
    use super::*;
    use serde_json::json;
    use submarin_converter::{
        convert_fn, convert_fn_with_option, Converter, ConverterOptions, Plugin, StepRef,
    };

    fn apply(step: usize, text: &str) -> String {
        match step {
            0 => text.to_uppercase(),
            1 => text.chars().rev().collect(),
            2 => format!("{text}{text}"),
            _ => format!("{text}-x"),
        }
    }

    fn converter() -> Converter {
        Converter::new(
            [
                ("upper", Plugin::new(vec![convert_fn(|text| Ok(apply(0, text)))])),
                ("reverse", Plugin::new(vec![convert_fn(|text| Ok(apply(1, text)))])),
                ("double", Plugin::new(vec![convert_fn(|text| Ok(apply(2, text)))])),
                (
                    "suffix",
                    Plugin::new(vec![
                        convert_fn(|_| Err("never first".into())),
                        convert_fn_with_option(|text, option| {
                            Ok(format!("{}{}", text, option["suffix"].as_str().unwrap_or_default()))
                        }),
                    ])
                    .with_default_option(json!({ "suffix": "-x" })),
                ),
            ],
            ConverterOptions::default(),
        )
        .unwrap()
    }

    const NAMES: [&str; 4] = ["upper", "reverse", "double", "suffix"];

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Property: output is the left fold of the steps, one detail per step
        #[test]
        fn prop_convert_is_left_fold(
            input in "[a-zA-Z]{0,8}",
            steps in prop::collection::vec(0usize..4, 0..6),
        ) {
            let converter = converter();
            let refs: Vec<StepRef> = steps.iter().map(|&i| StepRef::from(NAMES[i])).collect();

            let output = tokio_test::block_on(converter.convert(&input, refs)).unwrap();
            let expected = steps.iter().fold(input.clone(), |text, &i| apply(i, &text));

            prop_assert_eq!(&output.text, &expected);
            prop_assert_eq!(output.details.len(), steps.len());
            prop_assert!(output.succeeded());

            let mut text = input;
            for (detail, &i) in output.details.iter().zip(&steps) {
                text = apply(i, &text);
                prop_assert_eq!(&detail.converted_text, &text);
                prop_assert_eq!(detail.name(), NAMES[i]);
            }
        }

        /// Property: an unknown id cuts the pipeline at that position
        #[test]
        fn prop_unknown_step_truncates(
            before in prop::collection::vec(0usize..4, 0..4),
            after in prop::collection::vec(0usize..4, 0..4),
        ) {
            let converter = converter();
            let mut refs: Vec<StepRef> = before.iter().map(|&i| StepRef::from(NAMES[i])).collect();
            refs.push(StepRef::from("ghost"));
            refs.extend(after.iter().map(|&i| StepRef::from(NAMES[i])));

            let output = tokio_test::block_on(converter.convert("seed", refs)).unwrap();
            let expected = before.iter().fold("seed".to_string(), |text, &i| apply(i, &text));

            prop_assert_eq!(output.text, expected);
            prop_assert_eq!(output.details.len(), before.len());
        }
    }
}
