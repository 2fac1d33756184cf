use rstest::rstest;
use serde_json::json;
use toon_codec::{
    decode_to_value, encode_default, encode_value, DecodeOptions, EncodeOptions, Value,
};

fn decode_json(input: &str) -> serde_json::Value {
    serde_json::Value::from(decode_to_value(input, &DecodeOptions::default()).unwrap())
}

#[rstest]
fn nested_objects() {
    assert_eq!(
        decode_json("parent:\n  child: value"),
        json!({"parent": {"child": "value"}})
    );
    assert_eq!(
        decode_json("level1:\n  level2:\n    level3:\n      value: deep"),
        json!({"level1": {"level2": {"level3": {"value": "deep"}}}})
    );
}

#[rstest]
fn empty_object_values() {
    assert_eq!(decode_json("a:"), json!({"a": {}}));
    assert_eq!(decode_json("a:\nb: 1"), json!({"a": {}, "b": 1}));
}

#[rstest]
fn root_scalars() {
    assert_eq!(decode_json("42"), json!(42));
    assert_eq!(decode_json("-100"), json!(-100));
    assert_eq!(decode_json("3.14"), json!(3.14));
    assert_eq!(decode_json("true"), json!(true));
    assert_eq!(decode_json("null"), json!(null));
    assert_eq!(decode_json("\"hello world\""), json!("hello world"));
    assert_eq!(decode_json("hello"), json!("hello"));
}

#[rstest]
fn quoted_strings_preserve_special_content() {
    assert_eq!(decode_json("note: \"a: b\""), json!({"note": "a: b"}));
    assert_eq!(decode_json("note: \"line1\\nline2\""), json!({"note": "line1\nline2"}));
    assert_eq!(decode_json("note: \"say \\\"hi\\\"\""), json!({"note": "say \"hi\""}));
    assert_eq!(decode_json("note: \"  padded  \""), json!({"note": "  padded  "}));
    assert_eq!(decode_json("note: \"007\""), json!({"note": "007"}));
    assert_eq!(decode_json("note: \"true\""), json!({"note": "true"}));
}

#[rstest]
fn numeric_looking_tokens_with_leading_zeros_stay_strings() {
    assert_eq!(decode_json("zip: 00742"), json!({"zip": "00742"}));
}

#[rstest]
fn quoted_keys() {
    assert_eq!(decode_json("\"key:colon\": 1"), json!({"key:colon": 1}));
    assert_eq!(decode_json("\"007\": x"), json!({"007": "x"}));
    assert_eq!(decode_json("\"\": empty"), json!({"": "empty"}));
}

#[rstest]
fn keys_quote_by_the_value_rule() {
    assert_eq!(
        encode_default(&json!({"key:colon": 1})).unwrap(),
        "\"key:colon\": 1"
    );
    assert_eq!(encode_default(&json!({"007": "x"})).unwrap(), "\"007\": x");
    assert_eq!(encode_default(&json!({"": 1})).unwrap(), "\"\": 1");
    // Interior spaces and dots are not structural, so these stay bare.
    assert_eq!(encode_default(&json!({"key name": 1})).unwrap(), "key name: 1");
    assert_eq!(encode_default(&json!({"a.b": 1})).unwrap(), "a.b: 1");
}

#[rstest]
fn strings_that_mimic_structure_are_protected() {
    let cases = json!({
        "kw": "null",
        "num": "42",
        "neg": "-7",
        "marker": "- item",
        "header": "[3]",
        "brace": "{x}",
        "colon": "a:b"
    });
    let text = encode_default(&cases).unwrap();
    assert_eq!(decode_json(&text), cases);
}

#[rstest]
fn unicode_content_passes_through() {
    assert_eq!(decode_json("名前: 値"), json!({"名前": "値"}));
    assert_eq!(decode_json("emoji: 🎉"), json!({"emoji": "🎉"}));
    assert_eq!(decode_json("s: \"\\u00E9\\uD83D\\uDE00\""), json!({"s": "é😀"}));
}

#[rstest]
fn key_order_is_preserved() {
    let text = "z: 1\na: 2\nm: 3";
    let value = decode_to_value(text, &DecodeOptions::default()).unwrap();
    let keys: Vec<String> = value
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[rstest]
fn sort_keys_affects_objects_but_not_tabular_fields() {
    let data = json!({
        "z": 1,
        "a": [{"m": 1, "b": 2}, {"m": 3, "b": 4}]
    });
    let sorted = encode_value(
        &Value::from(&data),
        &EncodeOptions::new().with_sort_keys(true),
    )
    .unwrap();
    assert_eq!(sorted, "a[2]{b,m}:\n  2,1\n  4,3\nz: 1");

    // The tabular field list is sorted even when sort_keys is off.
    let plain = encode_value(&Value::from(&data), &EncodeOptions::default()).unwrap();
    assert_eq!(plain, "z: 1\na[2]{b,m}:\n  2,1\n  4,3");
}

#[rstest]
fn scalar_values_under_keys() {
    assert_eq!(decode_json("a: null\nb: true\nc: -2.5"), json!({"a": null, "b": true, "c": -2.5}));
}

#[rstest]
fn type_handlers_claim_unparseable_tokens() {
    use toon_codec::{decode_to_value_with_handlers, TypeHandler, TypeHandlerRegistry};

    struct HexHandler;

    impl TypeHandler for HexHandler {
        fn name(&self) -> &str {
            "hex"
        }

        fn matches(&self, token: &str) -> bool {
            token.starts_with("0x")
        }

        fn decode(&self, token: &str) -> Option<Value> {
            u64::from_str_radix(token.trim_start_matches("0x"), 16)
                .ok()
                .map(|u| Value::Number(toon_codec::Number::PosInt(u)))
        }
    }

    let mut registry = TypeHandlerRegistry::new();
    registry.register(Box::new(HexHandler));

    let value =
        decode_to_value_with_handlers("mask: 0xff\nname: plain", &DecodeOptions::default(), &registry)
            .unwrap();
    assert_eq!(
        serde_json::Value::from(value),
        json!({"mask": 255, "name": "plain"})
    );

    // Without the registry the token falls back to a plain string.
    let value = decode_to_value("mask: 0xff", &DecodeOptions::default()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!({"mask": "0xff"}));
}

#[rstest]
fn whitespace_inside_unquoted_values_survives() {
    assert_eq!(decode_json("msg: hello world"), json!({"msg": "hello world"}));
    assert_eq!(
        encode_default(&json!({"msg": "hello world"})).unwrap(),
        "msg: hello world"
    );
}
