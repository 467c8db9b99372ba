//! Schema types
//!
//! Configuration-backed types (`ContentType`, `SettingType`,
//! `DomainMemberType`, ...) serialize in a fixed key order with empty
//! optional members omitted and free-form `settings` keys sorted, so equal
//! values always render to equal text. Membership and organization types
//! are plain records kept by the entity store.

mod content_type;
mod domain;
mod member;
mod organization;

pub use content_type::{ContentType, FieldDef, SettingType, ViewDef};
pub use domain::{
    DomainEntity, ROLE_ADMINISTRATOR, ROLE_EDITOR, ROLE_PUBLIC, default_member_types, default_roles,
};
pub use member::{Accessor, AccessorKind, DomainInvitation, DomainMember, DomainMemberType};
pub use organization::{ApiKey, DomainAccessor, Organization, User};

use domain_content::sort_value;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Serialize a free-form object with its keys sorted recursively.
pub(crate) fn sorted<S: Serializer>(map: &Map<String, Value>, serializer: S) -> Result<S::Ok, S::Error> {
    sort_value(&Value::Object(map.clone())).serialize(serializer)
}
