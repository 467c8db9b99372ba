//! Error types for domain-core

use crate::flow::{FlowAction, FlowState};

/// Result type for domain-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in domain-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration text is malformed
    #[error(transparent)]
    ConfigParse(#[from] domain_meta::ConfigParseError),

    /// The filesystem configuration could not be read or is corrupt
    #[error("Cannot load config for {key}: {message}")]
    ConfigSource { key: String, message: String },

    /// The entity store failed to save
    #[error("Persistence failed: {message}")]
    Persistence { message: String },

    /// The store file does not match its recorded checksums
    #[error("Store is corrupt: {message}")]
    StoreCorrupt { message: String },

    /// An action was applied in a state that does not accept it
    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: FlowState, action: FlowAction },

    #[error("Organization not found: {identifier}")]
    OrganizationNotFound { identifier: String },

    #[error("Domain not found: {organization}/{identifier}")]
    DomainNotFound {
        organization: String,
        identifier: String,
    },

    #[error("Member not found: {id}")]
    MemberNotFound { id: String },

    #[error("Invitation not found: {id}")]
    InvitationNotFound { id: String },

    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("Not a domain workspace (no {marker} directory found from {start})")]
    WorkspaceNotFound { marker: String, start: String },

    /// Notification could not be delivered
    #[error("Notification failed: {message}")]
    Notify { message: String },

    #[error(transparent)]
    Fs(#[from] domain_fs::Error),

    #[error(transparent)]
    Meta(#[from] domain_meta::Error),

    #[error(transparent)]
    Content(#[from] domain_content::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn config_source(key: impl ToString, message: impl Into<String>) -> Self {
        Self::ConfigSource {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn domain_not_found(organization: &str, identifier: &str) -> Self {
        Self::DomainNotFound {
            organization: organization.to_string(),
            identifier: identifier.to_string(),
        }
    }
}
