use indexmap::IndexMap;

use crate::encode::quoting::is_safe_identifier;
use crate::value::Value;

/// Fold eligibility is narrower than identifier safety: a leading
/// underscore marks a conventionally private key and never folds.
fn is_foldable_key(key: &str) -> bool {
    is_safe_identifier(key) && !key.starts_with('_')
}

/// Collapse single-key wrapper chains into dotted keys, recursing
/// independently into every branch. `{"a": {"b": {"c": 1}}}` becomes
/// `{"a.b.c": 1}`; the chain stops at the first multi-key object, empty
/// object, non-object value, or ineligible key, and the dotted key maps
/// to that stopping value.
pub(crate) fn fold_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (key, val) in map {
                let (path, leaf) = fold_chain(key, val);
                if path != *key && (map.contains_key(&path) || out.contains_key(&path)) {
                    // A literal sibling already owns the dotted name;
                    // keep this entry unfolded.
                    out.insert(key.clone(), fold_value(val));
                } else {
                    out.insert(path, fold_value(leaf));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(fold_value).collect()),
        other => other.clone(),
    }
}

fn fold_chain<'v>(key: &str, value: &'v Value) -> (String, &'v Value) {
    if !is_foldable_key(key) {
        return (key.to_string(), value);
    }
    let mut path = key.to_string();
    let mut current = value;
    loop {
        let Value::Object(map) = current else { break };
        if map.len() != 1 {
            break;
        }
        let (inner_key, inner_value) = map.get_index(0).expect("len checked");
        if !is_foldable_key(inner_key) {
            break;
        }
        path.push('.');
        path.push_str(inner_key);
        current = inner_value;
    }
    (path, current)
}
