use rstest::rstest;
use serde_json::json;
use toon_codec::{decode_to_value, encode_default, DecodeOptions, ToonError};

fn decode_json(input: &str) -> serde_json::Value {
    let value = decode_to_value(input, &DecodeOptions::default())
        .unwrap_or_else(|err| panic!("decode failed for {input:?}: {err}"));
    serde_json::Value::from(value)
}

#[rstest]
fn inline_arrays() {
    assert_eq!(decode_json("[3]: 1,2,3"), json!([1, 2, 3]));
    assert_eq!(decode_json("[3]: 1, 2, 3"), json!([1, 2, 3]));
    assert_eq!(decode_json("numbers[3]: 1,2,3"), json!({"numbers": [1, 2, 3]}));
    assert_eq!(
        decode_json("[4]: 1,true,null,\"hello\""),
        json!([1, true, null, "hello"])
    );
    assert_eq!(decode_json("[0]:"), json!([]));
    assert_eq!(decode_json("items[0]:"), json!({"items": []}));
}

#[rstest]
fn inline_arrays_with_explicit_delimiter_markers() {
    assert_eq!(decode_json("[3|]: 1|2|3"), json!([1, 2, 3]));
    assert_eq!(decode_json("[3\t]: 1\t2\t3"), json!([1, 2, 3]));
    assert_eq!(decode_json("tags[2|]: a,b|c"), json!({"tags": ["a,b", "c"]}));
}

#[rstest]
fn quoted_cells_protect_the_delimiter() {
    assert_eq!(decode_json("tags[2]: a,\"b,c\""), json!({"tags": ["a", "b,c"]}));
    assert_eq!(
        decode_json("[2]{name,desc}:\n\"Alice\",\"Developer\"\n\"Bob\",\"Designer\""),
        json!([
            {"name": "Alice", "desc": "Developer"},
            {"name": "Bob", "desc": "Designer"}
        ])
    );
}

#[rstest]
fn tabular_arrays() {
    assert_eq!(
        decode_json("users[2]{id,name}:\n  1,Alice\n  2,Bob"),
        json!({"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]})
    );
    // Root tabular rows may sit at the header's own depth.
    assert_eq!(
        decode_json("[2]{id,name}:\n1,Alice\n2,Bob"),
        json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}])
    );
}

#[rstest]
fn tabular_field_order_follows_the_header() {
    assert_eq!(
        decode_json("[1]{name,id}:\n  Alice,1"),
        json!([{"name": "Alice", "id": 1}])
    );
}

#[rstest]
fn list_arrays() {
    assert_eq!(decode_json("[2]:\n- 1\n- 2"), json!([1, 2]));
    assert_eq!(decode_json("[3]:\n- 42\n- true\n- null"), json!([42, true, null]));
    assert_eq!(
        decode_json("[2]:\n- name: Alice\n- name: Bob"),
        json!([{"name": "Alice"}, {"name": "Bob"}])
    );
    assert_eq!(decode_json("[2]:\n- [2]: 1,2\n- [2]: 3,4"), json!([[1, 2], [3, 4]]));
    assert_eq!(decode_json("[2]:\n-\n-"), json!([{}, {}]));
    assert_eq!(decode_json("[2]:\n- {}\n- {}"), json!([{}, {}]));
}

#[rstest]
fn list_item_objects_with_multiple_fields() {
    let input = "[1]:\n  - id: 1\n    name: Alice\n    active: true";
    assert_eq!(
        decode_json(input),
        json!([{"id": 1, "name": "Alice", "active": true}])
    );
}

#[rstest]
fn list_item_objects_with_nested_blocks() {
    let input = "[1]:\n  - outer:\n      middle:\n        inner: value";
    assert_eq!(
        decode_json(input),
        json!([{"outer": {"middle": {"inner": "value"}}}])
    );
}

#[rstest]
fn list_item_objects_with_array_first_field() {
    let input =
        "items[1]:\n  - users[2]{id,name}:\n      1,Ada\n      2,Bob\n    status: active";
    assert_eq!(
        decode_json(input),
        json!({
            "items": [{
                "users": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Bob"}],
                "status": "active"
            }]
        })
    );
}

#[rstest]
fn mixed_array_forms_in_one_document() {
    let input = "inline[3]: 1,2,3\nlist[2]:\n  - a\n  - b\ntabular[2]{x,y}:\n  1,2\n  3,4";
    assert_eq!(
        decode_json(input),
        json!({
            "inline": [1, 2, 3],
            "list": ["a", "b"],
            "tabular": [{"x": 1, "y": 2}, {"x": 3, "y": 4}]
        })
    );
}

#[rstest]
fn deeply_nested_list_items() {
    let input = "items[2]:\n  - level1:\n      level2:\n        value: a\n  - level1:\n      level2:\n        value: b";
    assert_eq!(
        decode_json(input),
        json!({
            "items": [
                {"level1": {"level2": {"value": "a"}}},
                {"level1": {"level2": {"value": "b"}}}
            ]
        })
    );
}

#[rstest]
fn blank_lines_are_ignored() {
    assert_eq!(
        decode_json("key1: value1\n\nkey2: value2\n\nkey3: value3\n"),
        json!({"key1": "value1", "key2": "value2", "key3": "value3"})
    );
    assert_eq!(decode_json("[2]:\n- 1\n\n- 2"), json!([1, 2]));
}

#[rstest]
fn malformed_headers_are_syntax_errors() {
    let options = DecodeOptions::default();
    for input in ["[abc]: 1", "[2: 1,2", "items[2]{id,name\n  1,Alice", "[2] 1,2"] {
        let err = decode_to_value(input, &options).unwrap_err();
        assert!(err.is_syntax(), "{input:?} should be a syntax error, got {err:?}");
    }
}

#[rstest]
fn syntax_errors_stay_fatal_in_lenient_mode() {
    let options = DecodeOptions::new().with_strict(false);
    let err = decode_to_value("[2: 1,2", &options).unwrap_err();
    assert!(err.is_syntax());
}

#[rstest]
fn duplicate_tabular_fields_are_rejected() {
    let err = decode_to_value("[2]{id,id}:\n  1,2", &DecodeOptions::default()).unwrap_err();
    assert!(matches!(err, ToonError::Syntax { .. }));
}

#[rstest]
fn empty_object_elements_encode_as_dash_braces() {
    assert_eq!(encode_default(&json!([{"id": 1}, {}])).unwrap(), "[2]:\n  - id: 1\n  - {}");
}

#[rstest]
fn trailing_content_after_root_array_is_rejected() {
    let err = decode_to_value("[1]: 1\nextra: 2", &DecodeOptions::default()).unwrap_err();
    assert!(err.is_syntax());
}
