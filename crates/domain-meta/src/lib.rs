//! Domain schema types and the canonical configuration codec.
//!
//! A *domain* is an organization's schema configuration: content types,
//! setting types, member types and roles. [`ConfigCodec`] turns a
//! [`DomainEntity`] into its canonical JSON text and parses text back.

pub mod admin_view;
pub mod codec;
pub mod error;
pub mod schema;

pub use admin_view::{OrderBy, TableViewConfig};
pub use codec::{ConfigCodec, ConfigParseError};
pub use error::{Error, Result};
pub use schema::{
    Accessor, AccessorKind, ApiKey, ContentType, DomainAccessor, DomainEntity, DomainInvitation,
    DomainMember, DomainMemberType, FieldDef, Organization, SettingType, User, ViewDef,
};
