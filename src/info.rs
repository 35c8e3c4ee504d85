//! Typed path access into JSON node payloads.
//!
//! Writes through [`ensure_path`] create any missing intermediate objects;
//! reads through [`get_path`] fail with the path walked so far and the key
//! that was missing.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("key '{key}' not found under '{path}'")]
    Missing { path: String, key: String },

    #[error("'{path}' is {found}, not an object")]
    NotAnObject { path: String, found: &'static str },

    #[error("empty path")]
    Empty,
}

fn joined(keys: &[&str]) -> String {
    if keys.is_empty() {
        "<root>".to_string()
    } else {
        keys.join(".")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Return a mutable slot at `keys`, creating missing objects on the way.
///
/// A `null` intermediate is replaced by an empty object. A newly created
/// final slot holds `null`.
pub fn ensure_path<'a>(value: &'a mut Value, keys: &[&str]) -> Result<&'a mut Value, PathError> {
    if keys.is_empty() {
        return Err(PathError::Empty);
    }

    let mut current = value;
    for (idx, key) in keys.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let found = type_name(current);
        let map = match current {
            Value::Object(map) => map,
            _ => {
                return Err(PathError::NotAnObject {
                    path: joined(&keys[..idx]),
                    found,
                })
            }
        };
        let last = idx + 1 == keys.len();
        current = map.entry(key.to_string()).or_insert_with(|| {
            if last {
                Value::Null
            } else {
                Value::Object(Map::new())
            }
        });
    }
    Ok(current)
}

/// Store `new` at `keys`, returning whatever was there before.
pub fn set_path(value: &mut Value, keys: &[&str], new: Value) -> Result<Option<Value>, PathError> {
    let slot = ensure_path(value, keys)?;
    let previous = std::mem::replace(slot, new);
    Ok((!previous.is_null()).then_some(previous))
}

/// Read the value at `keys`.
pub fn get_path<'a>(value: &'a Value, keys: &[&str]) -> Result<&'a Value, PathError> {
    if keys.is_empty() {
        return Err(PathError::Empty);
    }

    let mut current = value;
    for (idx, key) in keys.iter().enumerate() {
        let map = current.as_object().ok_or_else(|| PathError::NotAnObject {
            path: joined(&keys[..idx]),
            found: type_name(current),
        })?;
        current = map.get(*key).ok_or_else(|| PathError::Missing {
            path: joined(&keys[..idx]),
            key: key.to_string(),
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ensure_materializes_intermediate_objects() {
        let mut value = Value::Null;
        *ensure_path(&mut value, &["a", "b", "c"]).unwrap() = json!(3);
        assert_eq!(value, json!({"a": {"b": {"c": 3}}}));

        *ensure_path(&mut value, &["a", "d"]).unwrap() = json!("x");
        assert_eq!(value, json!({"a": {"b": {"c": 3}, "d": "x"}}));
    }

    #[test]
    fn ensure_refuses_to_overwrite_scalars() {
        let mut value = json!({"a": 1});
        let err = ensure_path(&mut value, &["a", "b"]).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAnObject {
                path: "a".to_string(),
                found: "a number"
            }
        );
    }

    #[test]
    fn set_returns_previous_value() {
        let mut value = json!({});
        assert_eq!(set_path(&mut value, &["k"], json!(1)).unwrap(), None);
        assert_eq!(set_path(&mut value, &["k"], json!(2)).unwrap(), Some(json!(1)));
    }

    #[test]
    fn get_reports_where_the_walk_stopped() {
        let value = json!({"a": {"b": {}}});
        assert_eq!(get_path(&value, &["a", "b"]).unwrap(), &json!({}));
        let err = get_path(&value, &["a", "b", "c"]).unwrap_err();
        assert_eq!(err.to_string(), "key 'c' not found under 'a.b'");
        let err = get_path(&value, &["x"]).unwrap_err();
        assert_eq!(err.to_string(), "key 'x' not found under '<root>'");
    }

    #[test]
    fn empty_paths_are_rejected() {
        let mut value = json!({});
        assert_eq!(get_path(&value, &[]).unwrap_err(), PathError::Empty);
        assert_eq!(ensure_path(&mut value, &[]).unwrap_err(), PathError::Empty);
    }
}
