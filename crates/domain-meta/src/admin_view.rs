//! Listing configuration for table admin views

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entries shown per page when a view sets no limit
pub const DEFAULT_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub order: String,
}

impl OrderBy {
    fn newest_first() -> Self {
        Self {
            field: "created".to_string(),
            order: "DESC".to_string(),
        }
    }
}

/// Resolved settings of a table view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableViewConfig {
    pub limit: u64,
    pub order_by: Vec<OrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl TableViewConfig {
    /// Resolve a view's raw settings, filling in defaults.
    ///
    /// - `limit`: 20 when absent or zero; whole numbers given as floats or
    ///   strings (`50.0`, `"50"`) are accepted
    /// - `orderBy`: newest `created` first when absent or empty
    /// - `filter`: kept only when it has a non-empty `field`, `AND` or `OR`
    pub fn from_settings(settings: &Map<String, Value>) -> Self {
        let limit = settings
            .get("limit")
            .filter(|v| !is_empty(v))
            .and_then(|v| {
                let limit = parse_limit(v);
                if limit.is_none() {
                    tracing::warn!(limit = %v, "ignoring malformed limit setting");
                }
                limit
            })
            .unwrap_or(DEFAULT_LIMIT);

        let order_by = settings
            .get("orderBy")
            .filter(|v| !is_empty(v))
            .and_then(|v| match serde_json::from_value::<Vec<OrderBy>>(v.clone()) {
                Ok(list) => Some(list),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed orderBy setting");
                    None
                }
            })
            .unwrap_or_else(|| vec![OrderBy::newest_first()]);

        let filter = settings.get("filter").filter(|filter| {
            ["field", "AND", "OR"]
                .iter()
                .any(|key| filter.get(*key).is_some_and(|v| !is_empty(v)))
        });

        Self {
            limit,
            order_by,
            filter: filter.cloned(),
        }
    }
}

impl Default for TableViewConfig {
    fn default() -> Self {
        Self::from_settings(&Map::new())
    }
}

/// A positive whole number, written as an integer, a float or a string.
fn parse_limit(value: &Value) -> Option<u64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (number >= 1.0 && number.fract() == 0.0).then_some(number as u64)
}

/// Emptiness in the loose sense config authors expect: null, false, zero,
/// empty strings, arrays and objects are all "not set".
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
