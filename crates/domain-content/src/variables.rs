//! Configuration variables
//!
//! A configuration may declare a top-level `variables` object. Any string
//! value elsewhere in the document that equals a variable name is replaced
//! by that variable's value when the configuration is parsed.
//!
//! Older stores kept variables beside the configuration instead of inside
//! it; [`migrate_legacy_variables`] folds them back into the document.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Top-level key holding the variable definitions
pub const VARIABLES_KEY: &str = "variables";

/// Keys that lead a migrated document, in this order
const LEADING_KEYS: [&str; 3] = ["title", "identifier", VARIABLES_KEY];

/// Remove the `variables` object from `root` and substitute its values.
///
/// Only string *values* are substituted; object keys are never touched and
/// substituted values are not substituted again. Returns the removed
/// variable map, if the document declared one.
pub fn substitute_variables(root: &mut Value) -> Result<Option<Map<String, Value>>> {
    let Some(obj) = root.as_object_mut() else {
        return Ok(None);
    };

    let variables = match obj.remove(VARIABLES_KEY) {
        None => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(Error::InvalidVariables(format!(
                "expected an object, found {}",
                json_type_name(&other)
            )));
        }
    };

    if !variables.is_empty() {
        replace_strings(root, &variables);
    }

    Ok(Some(variables))
}

fn replace_strings(value: &mut Value, variables: &Map<String, Value>) {
    match value {
        Value::String(s) => {
            if let Some(replacement) = variables.get(s.as_str()) {
                *value = replacement.clone();
            }
        }
        Value::Array(items) => {
            for item in items {
                replace_strings(item, variables);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                replace_strings(item, variables);
            }
        }
        _ => {}
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Fold legacy out-of-document variables into a serialized configuration.
///
/// Every occurrence of a variable's JSON-encoded value in `config` is
/// replaced by the JSON-quoted variable name, the variable map is inserted
/// under `variables`, and the top-level keys are stably reordered so that
/// `title`, `identifier` and `variables` lead.
///
/// The replacement is literal text substitution on the encoded document. A
/// value that also occurs somewhere it was never meant as a variable (for
/// example inside a longer string) is rewritten as well.
pub fn migrate_legacy_variables(config: &str, variables: &Map<String, Value>) -> Result<String> {
    let mut json = config.to_string();
    for (name, value) in variables {
        let encoded = value.to_string();
        let placeholder = Value::String(name.clone()).to_string();
        json = json.replace(&encoded, &placeholder);
    }

    let root: Value = serde_json::from_str(&json)?;
    let Value::Object(mut map) = root else {
        return Err(Error::parse("JSON", "configuration root must be an object"));
    };
    map.insert(VARIABLES_KEY.to_string(), Value::Object(variables.clone()));

    let mut entries: Vec<(String, Value)> = map.into_iter().collect();
    entries.sort_by_key(|(key, _)| {
        LEADING_KEYS
            .iter()
            .position(|k| *k == key.as_str())
            .unwrap_or(LEADING_KEYS.len())
    });

    tracing::debug!(count = variables.len(), "migrated legacy config variables");
    Ok(Value::Object(entries.into_iter().collect()).to_string())
}
