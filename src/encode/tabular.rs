use crate::value::Value;

/// Decide whether an array of objects can be rendered as a uniform table
/// and return its field list, sorted by code point.
///
/// An empty array is trivially tabular with no fields. A non-empty array
/// is tabular iff every element is an object, every element shares the
/// same key set (order irrelevant), and no field value is itself an array
/// or object -- empty ones included.
///
/// The sort is unconditional: it does not follow the encoder's
/// `sort_keys` flag, which only affects ordinary object key order.
pub fn analyze(items: &[Value]) -> (bool, Vec<&str>) {
    if items.is_empty() {
        return (true, Vec::new());
    }

    let first = match &items[0] {
        Value::Object(map) => map,
        _ => return (false, Vec::new()),
    };
    if !first.values().all(Value::is_primitive) {
        return (false, Vec::new());
    }

    let mut fields: Vec<&str> = first.keys().map(String::as_str).collect();
    fields.sort_unstable();

    for item in &items[1..] {
        let obj = match item {
            Value::Object(map) => map,
            _ => return (false, Vec::new()),
        };
        if obj.len() != fields.len() {
            return (false, Vec::new());
        }
        if !fields.iter().all(|field| obj.contains_key(*field)) {
            return (false, Vec::new());
        }
        if !obj.values().all(Value::is_primitive) {
            return (false, Vec::new());
        }
    }

    (true, fields)
}
