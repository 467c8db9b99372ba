//! Error types for domain-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    ConfigParse(#[from] crate::codec::ConfigParseError),

    #[error("Content type not found: {identifier}")]
    ContentTypeNotFound { identifier: String },

    #[error("Member type not found: {identifier}")]
    MemberTypeNotFound { identifier: String },
}
