mod folding;
pub(crate) mod number;
pub(crate) mod quoting;
pub mod tabular;
mod writer;

use indexmap::IndexMap;

use crate::error::{ToonError, ToonResult};
use crate::options::{EncodeOptions, KeyFolding};
use crate::value::Value;

use writer::Writer;

/// Encode a [`Value`] to TOON text.
///
/// # Examples
/// ```
/// use toon_codec::{encode_value, EncodeOptions, Value};
/// use serde_json::json;
///
/// let value = Value::from(&json!({"id": 1, "name": "Alice"}));
/// let toon = encode_value(&value, &EncodeOptions::default())?;
/// assert_eq!(toon, "id: 1\nname: Alice");
/// # Ok::<(), toon_codec::ToonError>(())
/// ```
pub fn encode_value(value: &Value, options: &EncodeOptions) -> ToonResult<String> {
    options.validate()?;
    let folded;
    let value = if options.key_folding == KeyFolding::Safe {
        folded = folding::fold_value(value);
        &folded
    } else {
        value
    };
    let mut writer = Writer::new(options.clone());
    write_root(&mut writer, value)?;
    Ok(writer.finish())
}

fn write_root(w: &mut Writer, value: &Value) -> ToonResult<()> {
    match value {
        Value::Array(items) => write_array(w, items, 1),
        Value::Object(map) => {
            if map.is_empty() {
                Ok(())
            } else {
                write_object(w, map, 0)
            }
        }
        scalar => w.write_scalar(scalar),
    }
}

fn check_depth(w: &Writer, depth: usize) -> ToonResult<()> {
    if depth > w.options.max_depth {
        return Err(ToonError::MaxDepthExceeded(w.options.max_depth));
    }
    Ok(())
}

fn ordered_entries<'m>(
    map: &'m IndexMap<String, Value>,
    sort: bool,
) -> Vec<(&'m String, &'m Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    if sort {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    entries
}

fn write_object(w: &mut Writer, map: &IndexMap<String, Value>, depth: usize) -> ToonResult<()> {
    check_depth(w, depth)?;
    let sort = w.options.sort_keys;
    for (i, (key, value)) in ordered_entries(map, sort).into_iter().enumerate() {
        if i > 0 {
            w.newline();
        }
        w.indent(depth);
        match value {
            Value::Array(items) => {
                w.write_key(key);
                write_array(w, items, depth + 1)?;
            }
            Value::Object(nested) => {
                w.write_key(key);
                w.push_char(':');
                if !nested.is_empty() {
                    w.newline();
                    write_object(w, nested, depth + 1)?;
                }
            }
            scalar => {
                w.write_key(key);
                w.push_str(": ");
                w.write_scalar(scalar)?;
            }
        }
    }
    Ok(())
}

enum ArrayKind<'a> {
    Tabular(Vec<&'a str>),
    Inline,
    List,
}

/// Encoding selection in priority order: tabular with a non-empty field
/// list, then single-line inline for all-scalar content, then the list
/// fallback.
fn classify(items: &[Value]) -> ArrayKind<'_> {
    let (is_tabular, fields) = tabular::analyze(items);
    if is_tabular && !fields.is_empty() {
        return ArrayKind::Tabular(fields);
    }
    if items.iter().all(Value::is_primitive) {
        ArrayKind::Inline
    } else {
        ArrayKind::List
    }
}

/// Write an array header at the current cursor (callers fuse the owning
/// key in front) with its body lines at `body_depth`.
fn write_array(w: &mut Writer, items: &[Value], body_depth: usize) -> ToonResult<()> {
    check_depth(w, body_depth)?;
    if items.is_empty() {
        w.write_array_header(0, None);
        return Ok(());
    }

    match classify(items) {
        ArrayKind::Tabular(fields) => {
            w.write_array_header(items.len(), Some(&fields));
            for item in items {
                w.newline();
                w.indent(body_depth);
                let obj = item.as_object().expect("tabular elements are objects");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        w.write_delimiter();
                    }
                    w.write_scalar(obj.get(*field).unwrap_or(&Value::Null))?;
                }
            }
        }
        ArrayKind::Inline => {
            w.write_array_header(items.len(), None);
            w.push_char(' ');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    w.write_delimiter();
                }
                w.write_scalar(item)?;
            }
        }
        ArrayKind::List => {
            w.write_array_header(items.len(), None);
            for item in items {
                w.newline();
                w.indent(body_depth);
                w.push_char('-');
                match item {
                    Value::Array(inner) => {
                        w.push_char(' ');
                        write_array(w, inner, body_depth + 1)?;
                    }
                    Value::Object(obj) if obj.is_empty() => w.push_str(" {}"),
                    Value::Object(obj) => {
                        w.push_char(' ');
                        write_list_item_object(w, obj, body_depth)?;
                    }
                    scalar => {
                        w.push_char(' ');
                        w.write_scalar(scalar)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Object element of a list array: the first pair rides the dash line,
/// remaining pairs sit one level deeper, and any nested body (object
/// block or array rows) two levels deeper than the dash.
fn write_list_item_object(
    w: &mut Writer,
    obj: &IndexMap<String, Value>,
    dash_depth: usize,
) -> ToonResult<()> {
    check_depth(w, dash_depth + 1)?;
    let sort = w.options.sort_keys;
    for (i, (key, value)) in ordered_entries(obj, sort).into_iter().enumerate() {
        if i > 0 {
            w.newline();
            w.indent(dash_depth + 1);
        }
        match value {
            Value::Array(items) => {
                w.write_key(key);
                write_array(w, items, dash_depth + 2)?;
            }
            Value::Object(nested) => {
                w.write_key(key);
                w.push_char(':');
                if !nested.is_empty() {
                    w.newline();
                    write_object(w, nested, dash_depth + 2)?;
                }
            }
            scalar => {
                w.write_key(key);
                w.push_str(": ");
                w.write_scalar(scalar)?;
            }
        }
    }
    Ok(())
}
