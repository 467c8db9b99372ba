//! Canonical JSON form
//!
//! Object keys are sorted recursively, array order is kept. Two documents
//! that differ only in key order or whitespace have the same canonical form.

use serde_json::{Map, Value};

use crate::Result;

/// Return a copy of `value` with all object keys sorted recursively.
pub fn sort_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    sorted.insert(key.clone(), sort_value(v));
                }
            }
            Value::Object(sorted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_value).collect()),
        other => other.clone(),
    }
}

/// Parse JSON text and return its canonical compact form.
pub fn canonicalize(source: &str) -> Result<String> {
    let value: Value = serde_json::from_str(source)?;
    Ok(sort_value(&value).to_string())
}
