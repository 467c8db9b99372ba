//! A directory managed by the domain tools
//!
//! A workspace is any directory containing `.domains/`. Its manifest
//! decides where configuration files, the store and the outbox live.

use std::fs;
use std::path::Path;

use domain_fs::{ConfigStore, FsConfigSource, NormalizedPath};

use crate::manifest::Manifest;
use crate::notify::OutboxNotifier;
use crate::store::FileStore;
use crate::{Error, Result};

/// Directory marking a workspace root
pub const MARKER_DIR: &str = ".domains";

/// Manifest path relative to the root
pub const MANIFEST_FILE: &str = ".domains/config.toml";

#[derive(Debug, Clone)]
pub struct Workspace {
    root: NormalizedPath,
    manifest: Manifest,
}

impl Workspace {
    /// Open the workspace rooted at `root`; a missing manifest means defaults.
    pub fn open(root: impl Into<NormalizedPath>) -> Result<Self> {
        let root = root.into();
        let manifest = ConfigStore::new().load_or_default(&root.join(MANIFEST_FILE))?;
        Ok(Self { root, manifest })
    }

    /// Find the workspace containing `start`, walking up its ancestors.
    pub fn discover(start: &Path) -> Result<Self> {
        start
            .ancestors()
            .find(|dir| dir.join(MARKER_DIR).is_dir())
            .map(Self::open)
            .unwrap_or_else(|| {
                Err(Error::WorkspaceNotFound {
                    marker: MARKER_DIR.to_string(),
                    start: start.display().to_string(),
                })
            })
    }

    /// Create the workspace layout under `root`, keeping an existing manifest.
    pub fn init(root: impl Into<NormalizedPath>) -> Result<Self> {
        let root = root.into();
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            ConfigStore::new().save(&manifest_path, &Manifest::default())?;
            tracing::info!(root = %root, "Initialized domain workspace");
        }

        let workspace = Self::open(root)?;
        fs::create_dir_all(workspace.config_dir().to_native())?;
        Ok(workspace)
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn config_dir(&self) -> NormalizedPath {
        self.root.join(&self.manifest.core.config_dir)
    }

    pub fn store_path(&self) -> NormalizedPath {
        self.root.join(&self.manifest.core.store)
    }

    pub fn outbox_path(&self) -> NormalizedPath {
        self.root.join(&self.manifest.mail.outbox)
    }

    pub fn config_source(&self) -> FsConfigSource {
        FsConfigSource::new(self.config_dir())
    }

    pub fn open_store(&self) -> Result<FileStore> {
        FileStore::open(self.store_path())
    }

    pub fn notifier(&self) -> OutboxNotifier {
        OutboxNotifier::new(self.outbox_path(), self.manifest.mail.sender.clone())
    }
}
