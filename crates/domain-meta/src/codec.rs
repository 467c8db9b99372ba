//! Canonical configuration codec
//!
//! `serialize` renders the typed configuration of a [`DomainEntity`] as
//! compact JSON with a fixed key order; `parse` reads any well-formed
//! configuration text back. Formatting, key order of free-form objects and
//! `variables` indirection never survive a round trip, which is what makes
//! the serialized text usable for equality checks.

use std::collections::BTreeMap;

use domain_content::substitute_variables;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{
    ContentType, DomainEntity, DomainMemberType, SettingType, default_member_types,
    default_roles,
};

/// Configuration text could not be turned into a domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse domain definition JSON: {message}")]
pub struct ConfigParseError {
    pub message: String,
}

impl ConfigParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Shape of a domain configuration document, in serialized key order
#[derive(Debug, Serialize, Deserialize)]
struct DomainDocument {
    title: String,
    identifier: String,
    #[serde(default)]
    content_types: Vec<ContentType>,
    #[serde(default)]
    setting_types: Vec<SettingType>,
    #[serde(default = "default_member_types")]
    domain_member_types: Vec<DomainMemberType>,
    #[serde(default = "default_roles")]
    roles: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    permissions: BTreeMap<String, String>,
}

impl From<&DomainEntity> for DomainDocument {
    fn from(entity: &DomainEntity) -> Self {
        Self {
            title: entity.title.clone(),
            identifier: entity.identifier.clone(),
            content_types: entity.content_types.clone(),
            setting_types: entity.setting_types.clone(),
            domain_member_types: entity.domain_member_types.clone(),
            roles: entity.roles.clone(),
            permissions: entity.permissions.clone(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigCodec;

impl ConfigCodec {
    pub fn new() -> Self {
        Self
    }

    /// Canonical compact text of the entity's configuration.
    pub fn serialize(&self, entity: &DomainEntity) -> String {
        self.to_value(entity).to_string()
    }

    /// Canonical configuration, indented for files and editors.
    pub fn serialize_pretty(&self, entity: &DomainEntity) -> String {
        format!("{:#}", self.to_value(entity))
    }

    /// Canonical configuration as a JSON value.
    pub fn to_value(&self, entity: &DomainEntity) -> Value {
        serde_json::json!(DomainDocument::from(entity))
    }

    /// Parse configuration text into a new, organization-less entity.
    ///
    /// The returned entity's `config` holds the input document re-indented,
    /// with its `variables` (if any) still unresolved.
    ///
    /// # Errors
    ///
    /// Fails when the text is not a JSON object, `variables` is malformed,
    /// or `title`/`identifier` are missing.
    pub fn parse(&self, text: &str) -> Result<DomainEntity, ConfigParseError> {
        let original: Value = serde_json::from_str(text)?;
        if !original.is_object() {
            return Err(ConfigParseError::new("configuration root must be an object"));
        }

        let mut resolved = original.clone();
        substitute_variables(&mut resolved).map_err(|e| ConfigParseError::new(e.to_string()))?;
        let document: DomainDocument = serde_json::from_value(resolved)?;

        let mut entity = DomainEntity::new(document.title, document.identifier);
        entity.content_types = document.content_types;
        for content_type in &mut entity.content_types {
            content_type.ensure_default_view();
        }
        entity.setting_types = document.setting_types;
        entity.domain_member_types = document.domain_member_types;
        entity.roles = document.roles;
        entity.permissions = document.permissions;
        entity.config = format!("{:#}", original);

        Ok(entity)
    }

    /// Canonical form of configuration text: `serialize(parse(text))`.
    pub fn canonicalize(&self, text: &str) -> Result<String, ConfigParseError> {
        Ok(self.serialize(&self.parse(text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_requires_title_and_identifier() {
        let codec = ConfigCodec::new();
        assert!(codec.parse(r#"{"title":"Blog"}"#).is_err());
        assert!(codec.parse(r#"{"identifier":"blog"}"#).is_err());
        assert!(codec.parse(r#"{"title":"Blog","identifier":"blog"}"#).is_ok());
    }

    #[test]
    fn parse_rejects_non_objects() {
        let err = ConfigCodec::new().parse("[]").unwrap_err();
        assert!(err.message.contains("object"));
    }

    #[test]
    fn parse_keeps_unresolved_config_text() {
        let text = r#"{"title":"Blog","identifier":"blog","variables":{"r":"ROLE_PUBLIC"},"roles":["r"]}"#;
        let entity = ConfigCodec::new().parse(text).unwrap();

        assert_eq!(entity.roles, vec!["ROLE_PUBLIC".to_string()]);
        assert!(entity.config.contains("\"variables\""));
    }

    #[test]
    fn content_types_get_default_view() {
        let entity = ConfigCodec::new()
            .parse(r#"{"title":"Blog","identifier":"blog","content_types":[{"title":"News","identifier":"news"}]}"#)
            .unwrap();
        assert_eq!(entity.content_types[0].views.len(), 1);
        assert_eq!(entity.content_types[0].views[0].identifier, "all");
    }
}
