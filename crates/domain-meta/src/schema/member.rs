//! Domain member types, members and invitations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{DomainAccessor, FieldDef};

/// A kind of domain membership (e.g. editors, viewers) with its own fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMemberType {
    #[serde(default)]
    pub title: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl DomainMemberType {
    pub fn new(title: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: identifier.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn field(&self, identifier: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.identifier == identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessorKind {
    User,
    ApiKey,
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::ApiKey => write!(f, "api_key"),
        }
    }
}

/// Who a membership grants access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub id: Uuid,
    pub label: String,
}

impl Accessor {
    pub fn of(accessor: &impl DomainAccessor) -> Self {
        Self {
            kind: accessor.accessor_kind(),
            id: accessor.accessor_id(),
            label: accessor.label(),
        }
    }
}

/// Membership of an accessor in a domain, under one member type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainMember {
    pub id: Uuid,
    pub organization: String,
    pub domain: String,
    pub member_type: String,
    pub accessor: Accessor,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Values for the member type's fields
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl DomainMember {
    pub fn new(
        organization: impl Into<String>,
        domain: impl Into<String>,
        member_type: impl Into<String>,
        accessor: Accessor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization: organization.into(),
            domain: domain.into(),
            member_type: member_type.into(),
            accessor,
            roles: Vec::new(),
            data: Map::new(),
        }
    }
}

/// A pending invitation to join a domain under a member type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInvitation {
    pub id: Uuid,
    pub organization: String,
    pub domain: String,
    pub member_type: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// URL-safe secret the invitee presents to accept
    pub token: String,
    pub requested_at: DateTime<Utc>,
}
