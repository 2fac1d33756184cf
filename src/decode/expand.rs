use indexmap::IndexMap;

use crate::error::{ToonError, ToonResult};
use crate::value::Value;

/// Identifier segment for path expansion: ASCII letter or underscore
/// start, then letters, digits, underscores. Dots split segments before
/// this check runs.
pub(crate) fn is_identifier_segment(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return false,
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

/// A key expands only when it was unquoted, contains a dot, and every
/// segment is a plain identifier. Quoted keys keep their dots literally.
pub(crate) fn expandable_parts(key: &str, quoted: bool) -> Option<Vec<&str>> {
    if quoted || !key.contains('.') {
        return None;
    }
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().all(|part| is_identifier_segment(part)) {
        Some(parts)
    } else {
        None
    }
}

/// Insert a value at a dotted path, deep-merging objects. Conflicts
/// never overwrite silently: a leaf extended as a path, a path collided
/// with a leaf, or a literal duplicate path all raise.
pub(crate) fn insert_path(
    map: &mut IndexMap<String, Value>,
    parts: &[&str],
    value: Value,
    line: usize,
    column: usize,
) -> ToonResult<()> {
    insert_path_inner(map, parts, value, parts.len() > 1, line, column)
}

fn insert_path_inner(
    map: &mut IndexMap<String, Value>,
    parts: &[&str],
    value: Value,
    from_dotted: bool,
    line: usize,
    column: usize,
) -> ToonResult<()> {
    let segment = parts[0];
    if parts.len() == 1 {
        return match map.get_mut(segment) {
            None => {
                map.insert(segment.to_string(), value);
                Ok(())
            }
            Some(Value::Object(existing)) => match value {
                Value::Object(incoming) => merge_objects(existing, incoming, line, column),
                _ if from_dotted => Err(ToonError::validation(
                    format!("Key conflict at '{segment}'"),
                    line,
                    column,
                )),
                _ => Err(ToonError::validation(
                    format!("Duplicate key '{segment}'"),
                    line,
                    column,
                )),
            },
            Some(_) => Err(ToonError::validation(
                format!("Duplicate key '{segment}'"),
                line,
                column,
            )),
        };
    }

    match map.get_mut(segment) {
        None => {
            map.insert(segment.to_string(), Value::Object(IndexMap::new()));
        }
        Some(Value::Object(_)) => {}
        Some(_) => {
            return Err(ToonError::validation(
                format!("Key conflict at '{segment}'"),
                line,
                column,
            ));
        }
    }
    let Some(Value::Object(child)) = map.get_mut(segment) else {
        unreachable!("segment was just ensured to be an object");
    };
    insert_path_inner(child, &parts[1..], value, from_dotted, line, column)
}

fn merge_objects(
    target: &mut IndexMap<String, Value>,
    source: IndexMap<String, Value>,
    line: usize,
    column: usize,
) -> ToonResult<()> {
    for (key, value) in source {
        match target.get_mut(&key) {
            None => {
                target.insert(key, value);
            }
            Some(Value::Object(existing)) => match value {
                Value::Object(incoming) => merge_objects(existing, incoming, line, column)?,
                _ => {
                    return Err(ToonError::validation(
                        format!("Key conflict at '{key}'"),
                        line,
                        column,
                    ));
                }
            },
            Some(_) => {
                return Err(ToonError::validation(
                    format!("Duplicate key '{key}'"),
                    line,
                    column,
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn expand(pairs: &[(&str, Value)]) -> ToonResult<serde_json::Value> {
        let mut map = IndexMap::new();
        for (key, value) in pairs {
            match expandable_parts(key, false) {
                Some(parts) => insert_path(&mut map, &parts, value.clone(), 1, 1)?,
                None => {
                    map.insert(key.to_string(), value.clone());
                }
            }
        }
        Ok(serde_json::Value::from(Value::Object(map)))
    }

    fn num(n: i64) -> Value {
        Value::from(&json!(n))
    }

    #[rstest::rstest]
    fn test_is_identifier_segment() {
        assert!(is_identifier_segment("a"));
        assert!(is_identifier_segment("_foo"));
        assert!(is_identifier_segment("foo_bar"));
        assert!(is_identifier_segment("a1"));
        assert!(!is_identifier_segment(""));
        assert!(!is_identifier_segment("1a"));
        assert!(!is_identifier_segment("full-name"));
        assert!(!is_identifier_segment("a.b"));
    }

    #[rstest::rstest]
    fn test_expandable_parts() {
        assert_eq!(expandable_parts("a.b", false), Some(vec!["a", "b"]));
        assert_eq!(expandable_parts("a.b.c", false), Some(vec!["a", "b", "c"]));
        assert_eq!(expandable_parts("simple", false), None);
        assert_eq!(expandable_parts("a.b", true), None);
        assert_eq!(expandable_parts("full-name.x", false), None);
        assert_eq!(expandable_parts("data.0.value", false), None);
    }

    #[rstest::rstest]
    fn test_basic_expansion() {
        let result = expand(&[("a.b", num(1))]).unwrap();
        assert_eq!(result, json!({"a": {"b": 1}}));

        let result = expand(&[("a.b.c.d.e", Value::String("deep".into()))]).unwrap();
        assert_eq!(result, json!({"a": {"b": {"c": {"d": {"e": "deep"}}}}}));
    }

    #[rstest::rstest]
    fn test_sibling_paths_merge() {
        let result = expand(&[
            ("user.name", Value::String("Alice".into())),
            ("user.age", num(30)),
        ])
        .unwrap();
        assert_eq!(result, json!({"user": {"name": "Alice", "age": 30}}));
    }

    #[rstest::rstest]
    fn test_mixed_depth_siblings() {
        let result = expand(&[("a.b", num(1)), ("a.c.d", num(2)), ("a.e.f.g", num(3))]).unwrap();
        assert_eq!(
            result,
            json!({"a": {"b": 1, "c": {"d": 2}, "e": {"f": {"g": 3}}}})
        );
    }

    #[rstest::rstest]
    fn test_leaf_extended_as_path_conflicts() {
        let err = expand(&[("a", num(1)), ("a.b", num(2))]).unwrap_err();
        assert!(err.to_string().contains("Key conflict"));
    }

    #[rstest::rstest]
    fn test_path_collided_with_leaf_conflicts() {
        let mut map = IndexMap::new();
        insert_path(&mut map, &["a", "b"], num(1), 1, 1).unwrap();
        let err = insert_path(&mut map, &["a"], num(2), 2, 1).unwrap_err();
        assert!(err.to_string().contains("Duplicate key"));
    }

    #[rstest::rstest]
    fn test_nested_overwrite_conflicts() {
        let mut map = IndexMap::new();
        insert_path(&mut map, &["a", "b", "c"], num(1), 1, 1).unwrap();
        let err = insert_path(&mut map, &["a", "b"], Value::String("flat".into()), 2, 1)
            .unwrap_err();
        assert!(err.to_string().contains("Key conflict"));
    }

    #[rstest::rstest]
    fn test_duplicate_path_conflicts() {
        let mut map = IndexMap::new();
        insert_path(&mut map, &["a", "b"], num(1), 1, 1).unwrap();
        let err = insert_path(&mut map, &["a", "b"], num(2), 2, 1).unwrap_err();
        assert!(err.to_string().contains("Duplicate key"));
    }

    #[rstest::rstest]
    fn test_order_preserved() {
        let result = expand(&[("z.a", num(1)), ("y.a", num(2)), ("x.a", num(3))]).unwrap();
        let keys: Vec<&str> = result
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "y", "x"]);
    }
}
