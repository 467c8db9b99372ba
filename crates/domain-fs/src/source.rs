//! Sources of domain configuration text
//!
//! A [`ConfigSource`] maps a [`DomainKey`] (organization + domain identifier)
//! to the raw JSON text of that domain's configuration. [`FsConfigSource`]
//! stores one file per domain under `<root>/<organization>/<identifier>.json`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use crate::{Error, NormalizedPath, Result, io, validate_path_identifier};

const CONFIG_EXTENSION: &str = "json";

/// Identifies one domain configuration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DomainKey {
    pub organization: String,
    pub identifier: String,
}

impl DomainKey {
    pub fn new(organization: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            identifier: identifier.into(),
        }
    }
}

impl std::fmt::Display for DomainKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.organization, self.identifier)
    }
}

/// Where domain configuration text lives outside the entity store
pub trait ConfigSource {
    /// Whether a configuration exists for the key.
    fn exists(&self, key: &DomainKey) -> bool;

    /// Read the raw configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no configuration exists.
    fn read(&self, key: &DomainKey) -> Result<String>;

    /// List the domain identifiers available for an organization.
    fn list_available(&self, organization: &str) -> Result<BTreeSet<String>>;

    /// Write (create or replace) the configuration text.
    fn write(&mut self, key: &DomainKey, content: &str) -> Result<()>;

    /// Read the configuration if it exists.
    fn read_optional(&self, key: &DomainKey) -> Result<Option<String>> {
        if self.exists(key) {
            self.read(key).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Configuration files on the local filesystem
#[derive(Debug, Clone)]
pub struct FsConfigSource {
    root: NormalizedPath,
}

impl FsConfigSource {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Path of the configuration file for a key.
    ///
    /// # Errors
    ///
    /// Returns an error when either identifier is not a safe path segment.
    pub fn path_for(&self, key: &DomainKey) -> Result<NormalizedPath> {
        validate_path_identifier(&key.organization)?;
        validate_path_identifier(&key.identifier)?;
        Ok(self
            .root
            .join(&key.organization)
            .join(&format!("{}.{}", key.identifier, CONFIG_EXTENSION)))
    }
}

impl ConfigSource for FsConfigSource {
    fn exists(&self, key: &DomainKey) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    fn read(&self, key: &DomainKey) -> Result<String> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Err(Error::NotFound {
                key: key.to_string(),
            });
        }
        io::read_text(&path)
    }

    fn list_available(&self, organization: &str) -> Result<BTreeSet<String>> {
        validate_path_identifier(organization)?;
        let dir = self.root.join(organization);
        if !dir.is_dir() {
            return Ok(BTreeSet::new());
        }

        let native = dir.to_native();
        let entries = fs::read_dir(&native).map_err(|e| Error::io(&native, e))?;

        let mut identifiers = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&native, e))?;
            let path = NormalizedPath::new(entry.path());
            if !path.is_file() || path.extension() != Some(CONFIG_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                if validate_path_identifier(stem).is_ok() {
                    identifiers.insert(stem.to_string());
                } else {
                    tracing::debug!(path = %path, "skipping config file with unsafe name");
                }
            }
        }

        Ok(identifiers)
    }

    fn write(&mut self, key: &DomainKey, content: &str) -> Result<()> {
        let path = self.path_for(key)?;
        tracing::debug!(path = %path, "writing domain config");
        io::write_text(&path, content)
    }
}

/// In-memory configuration source
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigSource {
    files: BTreeMap<DomainKey, String>,
}

impl MemoryConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: DomainKey, content: impl Into<String>) -> Self {
        self.files.insert(key, content.into());
        self
    }

    pub fn get(&self, key: &DomainKey) -> Option<&str> {
        self.files.get(key).map(String::as_str)
    }
}

impl ConfigSource for MemoryConfigSource {
    fn exists(&self, key: &DomainKey) -> bool {
        self.files.contains_key(key)
    }

    fn read(&self, key: &DomainKey) -> Result<String> {
        self.files.get(key).cloned().ok_or_else(|| Error::NotFound {
            key: key.to_string(),
        })
    }

    fn list_available(&self, organization: &str) -> Result<BTreeSet<String>> {
        Ok(self
            .files
            .keys()
            .filter(|k| k.organization == organization)
            .map(|k| k.identifier.clone())
            .collect())
    }

    fn write(&mut self, key: &DomainKey, content: &str) -> Result<()> {
        self.files.insert(key.clone(), content.to_string());
        Ok(())
    }
}
