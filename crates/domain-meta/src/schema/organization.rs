//! Organizations and the accessors they own

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AccessorKind;

/// Something that can be made a domain member
pub trait DomainAccessor {
    fn accessor_id(&self) -> Uuid;
    fn accessor_kind(&self) -> AccessorKind;
    /// Human-readable name used in listings and choices
    fn label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl User {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
        }
    }
}

impl DomainAccessor for User {
    fn accessor_id(&self) -> Uuid {
        self.id
    }

    fn accessor_kind(&self) -> AccessorKind {
        AccessorKind::User
    }

    fn label(&self) -> String {
        if self.name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", self.name, self.email)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Uuid,
    pub name: String,
}

impl ApiKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl DomainAccessor for ApiKey {
    fn accessor_id(&self) -> Uuid {
        self.id
    }

    fn accessor_kind(&self) -> AccessorKind {
        AccessorKind::ApiKey
    }

    fn label(&self) -> String {
        format!("{} (API key)", self.name)
    }
}

/// An organization: owner of domains, users and API keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub api_keys: Vec<ApiKey>,
}

impl Organization {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            members: Vec::new(),
            api_keys: Vec::new(),
        }
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.members.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn api_key_by_name(&self, name: &str) -> Option<&ApiKey> {
        self.api_keys.iter().find(|k| k.name == name)
    }
}
