//! File-backed store
//!
//! Everything lives in one JSON document. Each domain is stored as its
//! canonical definition plus a checksum of that definition, so a store file
//! edited by hand is detected on load instead of silently trusted.

use domain_fs::{NormalizedPath, compute_content_checksum, io};
use domain_meta::{ConfigCodec, DomainEntity, DomainInvitation, DomainMember, Organization};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Change, Store, StoreState};
use crate::{Error, Result};

const STORE_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    version: String,
    #[serde(default)]
    organizations: Vec<Organization>,
    #[serde(default)]
    domains: Vec<StoredDomain>,
    #[serde(default)]
    members: Vec<DomainMember>,
    #[serde(default)]
    invitations: Vec<DomainInvitation>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDomain {
    id: Uuid,
    organization: String,
    /// Canonical configuration
    definition: String,
    /// Configuration text as last loaded or saved
    config: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    config_variables: Map<String, Value>,
    checksum: String,
}

impl StoredDomain {
    fn from_entity(codec: &ConfigCodec, domain: &DomainEntity) -> Self {
        let definition = codec.serialize(domain);
        Self {
            id: domain.id,
            organization: domain.organization.clone(),
            checksum: compute_content_checksum(&definition),
            definition,
            config: domain.config.clone(),
            config_variables: domain.config_variables.clone(),
        }
    }

    fn into_entity(self, codec: &ConfigCodec) -> Result<DomainEntity> {
        if compute_content_checksum(&self.definition) != self.checksum {
            return Err(Error::StoreCorrupt {
                message: format!("checksum mismatch for domain {}", self.id),
            });
        }

        let mut domain = codec.parse(&self.definition).map_err(|e| Error::StoreCorrupt {
            message: format!("domain {}: {}", self.id, e),
        })?;
        domain.id = self.id;
        domain.organization = self.organization;
        domain.config = self.config;
        domain.config_variables = self.config_variables;
        Ok(domain)
    }
}

/// Store persisted as a JSON document on disk
#[derive(Debug)]
pub struct FileStore {
    path: NormalizedPath,
    codec: ConfigCodec,
    state: StoreState,
    pending: Vec<Change>,
}

impl FileStore {
    /// Open the store at `path`; a missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreCorrupt`] if the file cannot be parsed or a
    /// stored domain fails its checksum.
    pub fn open(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let codec = ConfigCodec::new();

        let state = if path.exists() {
            let content = io::read_text_locked(&path)?;
            let document: StoreDocument =
                serde_json::from_str(&content).map_err(|e| Error::StoreCorrupt {
                    message: e.to_string(),
                })?;
            tracing::debug!(path = %path, domains = document.domains.len(), "Loaded store");
            Self::state_from(&codec, document)?
        } else {
            StoreState::default()
        };

        Ok(Self {
            path,
            codec,
            state,
            pending: Vec::new(),
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    fn state_from(codec: &ConfigCodec, document: StoreDocument) -> Result<StoreState> {
        let domains = document
            .domains
            .into_iter()
            .map(|stored| stored.into_entity(codec))
            .collect::<Result<Vec<_>>>()?;

        Ok(StoreState {
            organizations: document
                .organizations
                .into_iter()
                .map(|o| (o.identifier.clone(), o))
                .collect(),
            domains,
            members: document.members,
            invitations: document.invitations,
        })
    }

    fn document_for(&self, state: &StoreState) -> StoreDocument {
        StoreDocument {
            version: STORE_VERSION.to_string(),
            organizations: state.organizations.values().cloned().collect(),
            domains: state
                .domains
                .iter()
                .map(|d| StoredDomain::from_entity(&self.codec, d))
                .collect(),
            members: state.members.clone(),
            invitations: state.invitations.clone(),
        }
    }

    fn write(&self, state: &StoreState) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.document_for(state))?;
        io::write_text(&self.path, &content)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn state(&self) -> &StoreState {
        &self.state
    }

    fn stage(&mut self, change: Change) {
        self.pending.push(change);
    }

    fn pending(&self) -> &[Change] {
        &self.pending
    }

    fn flush(&mut self) -> Result<()> {
        let mut next = self.state.clone();
        for change in self.pending.drain(..) {
            next.apply(change);
        }

        if let Err(e) = self.write(&next) {
            tracing::error!(path = %self.path, "Failed to save store: {}", e);
            return Err(Error::persistence(e.to_string()));
        }

        self.state = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn domains_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("store.json"));

        let mut store = FileStore::open(path.clone()).unwrap();
        let mut domain = DomainEntity::new("Blog", "blog").with_organization("acme");
        domain.config = "{\"title\": \"Blog\"}".to_string();
        store.save_organization(Organization::new("acme", "ACME"));
        store.persist(&domain);
        store.flush().unwrap();

        let reopened = FileStore::open(path).unwrap();
        let loaded = reopened.find_domain("acme", "blog").unwrap();
        assert_eq!(loaded.id, domain.id);
        assert_eq!(loaded.config, domain.config);
        assert!(reopened.organization("acme").is_some());
    }

    #[test]
    fn tampered_definition_is_detected() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("store.json"));

        let mut store = FileStore::open(path.clone()).unwrap();
        store.persist(&DomainEntity::new("Blog", "blog").with_organization("acme"));
        store.flush().unwrap();

        let content = std::fs::read_to_string(path.to_native()).unwrap();
        std::fs::write(path.to_native(), content.replace("Blog", "Vlog")).unwrap();

        assert!(matches!(
            FileStore::open(path),
            Err(Error::StoreCorrupt { .. })
        ));
    }
}
