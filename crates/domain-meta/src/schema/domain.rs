//! The domain entity

use std::collections::BTreeMap;

use domain_fs::DomainKey;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{ContentType, DomainMemberType, SettingType};
use crate::{Error, Result};

/// Role every domain grants to anonymous access
pub const ROLE_PUBLIC: &str = "ROLE_PUBLIC";
/// Role for content editors
pub const ROLE_EDITOR: &str = "ROLE_EDITOR";
/// Role allowed to change the domain itself
pub const ROLE_ADMINISTRATOR: &str = "ROLE_ADMINISTRATOR";

pub fn default_roles() -> Vec<String> {
    vec![
        ROLE_PUBLIC.to_string(),
        ROLE_EDITOR.to_string(),
        ROLE_ADMINISTRATOR.to_string(),
    ]
}

pub fn default_member_types() -> Vec<DomainMemberType> {
    vec![
        DomainMemberType::new("Editors", "editor"),
        DomainMemberType::new("Viewers", "viewer"),
    ]
}

/// A domain of an organization
///
/// Holds the parsed configuration plus the configuration text it was last
/// loaded from or saved as.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainEntity {
    pub id: Uuid,
    /// Identifier of the owning organization
    pub organization: String,
    pub title: String,
    pub identifier: String,
    pub content_types: Vec<ContentType>,
    pub setting_types: Vec<SettingType>,
    pub domain_member_types: Vec<DomainMemberType>,
    pub roles: Vec<String>,
    /// Domain-level action name to role expression
    pub permissions: BTreeMap<String, String>,
    /// Current configuration text
    pub config: String,
    /// Variables stored beside the configuration by older releases
    pub config_variables: Map<String, Value>,
    config_changed: bool,
}

impl DomainEntity {
    /// A domain with default roles and member types and no content types
    pub fn new(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization: String::new(),
            title: title.into(),
            identifier: identifier.into(),
            content_types: Vec::new(),
            setting_types: Vec::new(),
            domain_member_types: default_member_types(),
            roles: default_roles(),
            permissions: BTreeMap::new(),
            config: String::new(),
            config_variables: Map::new(),
            config_changed: false,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn key(&self) -> DomainKey {
        DomainKey::new(&self.organization, &self.identifier)
    }

    /// Replace the configuration text.
    pub fn set_config(&mut self, config: impl Into<String>) {
        let config = config.into();
        if config != self.config {
            self.config = config;
            self.config_changed = true;
        }
    }

    /// Force the configuration to be written on the next save, even if its
    /// text did not change.
    pub fn mark_config_changed(&mut self) {
        self.config_changed = true;
    }

    pub fn is_config_changed(&self) -> bool {
        self.config_changed
    }

    /// Forget pending changes, typically after the configuration was saved.
    pub fn clear_config_changed(&mut self) {
        self.config_changed = false;
    }

    /// Take over the configuration of `other`, keeping this entity's
    /// identity (id and organization).
    pub fn apply_from(&mut self, other: &DomainEntity) {
        self.title = other.title.clone();
        self.identifier = other.identifier.clone();
        self.content_types = other.content_types.clone();
        self.setting_types = other.setting_types.clone();
        self.domain_member_types = other.domain_member_types.clone();
        self.roles = other.roles.clone();
        self.permissions = other.permissions.clone();
        self.set_config(other.config.clone());
    }

    pub fn content_type(&self, identifier: &str) -> Option<&ContentType> {
        self.content_types.iter().find(|c| c.identifier == identifier)
    }

    pub fn require_content_type(&self, identifier: &str) -> Result<&ContentType> {
        self.content_type(identifier)
            .ok_or_else(|| Error::ContentTypeNotFound {
                identifier: identifier.to_string(),
            })
    }

    pub fn setting_type(&self, identifier: &str) -> Option<&SettingType> {
        self.setting_types.iter().find(|s| s.identifier == identifier)
    }

    pub fn member_type(&self, identifier: &str) -> Option<&DomainMemberType> {
        self.domain_member_types
            .iter()
            .find(|m| m.identifier == identifier)
    }

    pub fn require_member_type(&self, identifier: &str) -> Result<&DomainMemberType> {
        self.member_type(identifier)
            .ok_or_else(|| Error::MemberTypeNotFound {
                identifier: identifier.to_string(),
            })
    }

    /// Roles that can be granted to members of this domain
    pub fn available_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
