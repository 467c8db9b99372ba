//! Content types, setting types and their fields and views

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::sorted;
use crate::admin_view::TableViewConfig;

/// View type rendered as a paginated table
pub const TABLE_VIEW: &str = "table";

/// A field of a content type, setting type or member type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(default)]
    pub title: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty", serialize_with = "sorted")]
    pub settings: Map<String, Value>,
}

/// An admin view over a content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDef {
    #[serde(default)]
    pub title: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub view_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty", serialize_with = "sorted")]
    pub settings: Map<String, Value>,
}

impl ViewDef {
    /// The view every content type gets when it declares none
    pub fn default_table() -> Self {
        Self {
            title: "All".to_string(),
            identifier: "all".to_string(),
            view_type: TABLE_VIEW.to_string(),
            settings: Map::new(),
        }
    }

    /// Listing configuration, for table views
    pub fn table_config(&self) -> Option<TableViewConfig> {
        (self.view_type == TABLE_VIEW).then(|| TableViewConfig::from_settings(&self.settings))
    }
}

/// A content type: a list of entries sharing the same fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    #[serde(default)]
    pub title: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub views: Vec<ViewDef>,
    /// Action name to role expression
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub permissions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<String>,
}

impl ContentType {
    pub fn field(&self, identifier: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.identifier == identifier)
    }

    pub fn view(&self, identifier: &str) -> Option<&ViewDef> {
        self.views.iter().find(|v| v.identifier == identifier)
    }

    /// Give the content type its default table view if it has no views.
    pub(crate) fn ensure_default_view(&mut self) {
        if self.views.is_empty() {
            self.views.push(ViewDef::default_table());
        }
    }
}

/// A setting type: a single entry of domain-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingType {
    #[serde(default)]
    pub title: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub permissions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locales: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn settings_keys_are_sorted_when_serialized() {
        let field: FieldDef = serde_json::from_value(json!({
            "title": "Body",
            "identifier": "body",
            "type": "text",
            "settings": {"z": 1, "a": {"y": 2, "b": 3}}
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_string(&field).unwrap(),
            r#"{"title":"Body","identifier":"body","type":"text","settings":{"a":{"b":3,"y":2},"z":1}}"#
        );
    }

    #[test]
    fn empty_members_are_omitted() {
        let ct: ContentType = serde_json::from_value(json!({"identifier": "news"})).unwrap();
        assert_eq!(
            serde_json::to_string(&ct).unwrap(),
            r#"{"title":"","identifier":"news","fields":[],"views":[]}"#
        );
    }

    #[test]
    fn only_table_views_have_table_config() {
        let mut view = ViewDef::default_table();
        assert!(view.table_config().is_some());
        view.view_type = "grid".to_string();
        assert!(view.table_config().is_none());
    }
}
