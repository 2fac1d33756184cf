use rstest::rstest;
use serde_json::json;
use toon_codec::{
    decode_to_value, decode_with_warnings, DecodeOptions, Indent, ToonError,
};

fn strict() -> DecodeOptions {
    DecodeOptions::default()
}

fn lenient() -> DecodeOptions {
    DecodeOptions::new().with_strict(false)
}

#[rstest]
fn inline_count_mismatch() {
    let err = decode_to_value("[3]: 1,2", &strict()).unwrap_err();
    assert_eq!(
        err,
        ToonError::validation("Array declares 3 items but found 2", 1, 1)
    );

    let (value, warnings) = decode_with_warnings("[3]: 1,2", &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!([1, 2]));
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("declares 3 items but found 2"));
}

#[rstest]
fn list_count_mismatch() {
    let err = decode_to_value("[3]:\n- 1\n- 2", &strict()).unwrap_err();
    assert!(err.to_string().contains("Array declares 3 items but found 2"));

    let (value, warnings) = decode_with_warnings("[3]:\n- 1\n- 2", &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!([1, 2]));
    assert_eq!(warnings.len(), 1);
}

#[rstest]
fn row_count_mismatch() {
    let err = decode_to_value("[3]{id,name}:\n1,Alice\n2,Bob", &strict()).unwrap_err();
    assert!(err.to_string().contains("Array declares 3 rows but found 2"));

    let (value, warnings) =
        decode_with_warnings("[3]{id,name}:\n1,Alice\n2,Bob", &lenient()).unwrap();
    assert_eq!(
        serde_json::Value::from(value),
        json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}])
    );
    assert_eq!(warnings.len(), 1);
}

#[rstest]
fn row_field_count_mismatch() {
    let err = decode_to_value("[2]{id,name}:\n1,Alice\n2", &strict()).unwrap_err();
    assert!(err.to_string().contains("Row has 1 values but expected 2 fields"));

    // Lenient mode keeps the observed cells and fills the gap with null.
    let (value, warnings) = decode_with_warnings("[2]{id,name}:\n1,Alice\n2", &lenient()).unwrap();
    assert_eq!(
        serde_json::Value::from(value),
        json!([{"id": 1, "name": "Alice"}, {"id": 2, "name": null}])
    );
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("row 2"));
}

#[rstest]
fn duplicate_keys() {
    let err = decode_to_value("name: Alice\nname: Bob", &strict()).unwrap_err();
    assert!(err.to_string().contains("Duplicate key 'name'"));

    let (value, warnings) = decode_with_warnings("name: Alice\nname: Bob", &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!({"name": "Bob"}));
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, 2);
}

#[rstest]
fn duplicate_keys_inside_list_item_objects() {
    let input = "[1]:\n  - key: 1\n    key: 2";
    let err = decode_to_value(input, &strict()).unwrap_err();
    assert!(err.to_string().contains("Duplicate key"));

    let (value, _) = decode_with_warnings(input, &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!([{"key": 2}]));
}

#[rstest]
fn irregular_indentation() {
    let err = decode_to_value("a:\n   b: 1", &strict()).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("not a multiple of 2"));

    let (value, warnings) = decode_with_warnings("a:\n   b: 1", &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!({"a": {"b": 1}}));
    assert_eq!(warnings.len(), 1);
}

#[rstest]
fn tabs_in_indentation_are_syntax_errors_in_strict() {
    let err = decode_to_value("a:\n\tb: 1", &strict()).unwrap_err();
    assert!(err.is_syntax());

    // Lenient mode reads a tab as one indent unit.
    let value = decode_to_value("a:\n\tb: 1", &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!({"a": {"b": 1}}));
}

#[rstest]
fn indentation_jumps_are_fatal_everywhere() {
    for options in [strict(), lenient()] {
        let err = decode_to_value("a: 1\n    b: 2", &options).unwrap_err();
        assert!(err.is_syntax(), "expected syntax error, got {err:?}");
    }
}

#[rstest]
fn empty_input_decodes_to_empty_object() {
    for input in ["", "   \n   ", "\n\n"] {
        let value = decode_to_value(input, &strict()).unwrap();
        assert_eq!(serde_json::Value::from(value), json!({}));
    }
}

#[rstest]
fn strict_decodes_return_no_warnings() {
    let (_, warnings) = decode_with_warnings("a: 1\nb: 2", &strict()).unwrap();
    assert!(warnings.is_empty());
}

#[rstest]
fn declared_items_without_a_body() {
    let err = decode_to_value("[2]:", &strict()).unwrap_err();
    assert!(err.is_validation());

    let (value, warnings) = decode_with_warnings("[2]:", &lenient()).unwrap();
    assert_eq!(serde_json::Value::from(value), json!([]));
    assert_eq!(warnings.len(), 1);
}

#[rstest]
fn custom_indent_size() {
    let options = DecodeOptions::new().with_indent(Indent::spaces(4));
    let value = decode_to_value("user:\n    name: Alice", &options).unwrap();
    assert_eq!(serde_json::Value::from(value), json!({"user": {"name": "Alice"}}));
}

#[rstest]
fn warning_positions_point_at_the_source() {
    let (_, warnings) = decode_with_warnings("ok: 1\nbad[3]: 1,2", &lenient()).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line, 2);
    assert_eq!(warnings[0].column, 1);
}
