//! [`TestWorkspace`] builder for domain-manager test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary workspace directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust
/// use domain_test_utils::workspace::TestWorkspace;
///
/// let workspace = TestWorkspace::new().with_manifest("");
/// workspace.write_config("acme", "blog", "{}");
/// workspace.assert_file_exists("config/acme/blog.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
    config_dir: String,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            config_dir: "config".to_string(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `.domains/config.toml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        let marker = self.root().join(".domains");
        fs::create_dir_all(&marker).unwrap();
        fs::write(marker.join("config.toml"), content).unwrap();
        self
    }

    /// Use a config directory other than `config` (set it in the manifest too).
    pub fn with_config_dir(mut self, config_dir: &str) -> Self {
        self.config_dir = config_dir.to_string();
        self
    }

    /// Path of the config file of `organization/identifier`.
    pub fn config_path(&self, organization: &str, identifier: &str) -> PathBuf {
        self.root()
            .join(&self.config_dir)
            .join(organization)
            .join(format!("{identifier}.json"))
    }

    /// Write the config file of `organization/identifier`.
    pub fn write_config(&self, organization: &str, identifier: &str, content: &str) {
        let path = self.config_path(organization, identifier);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Read the config file of `organization/identifier`, if it exists.
    pub fn read_config(&self, organization: &str, identifier: &str) -> Option<String> {
        fs::read_to_string(self.config_path(organization, identifier)).ok()
    }

    /// Write an arbitrary file relative to the root.
    pub fn write_file(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    /// Assert that `path` (relative to the workspace root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the workspace root) does not exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `expected`.
    pub fn assert_file_contains(&self, path: &str, expected: &str) {
        let full_path = self.root().join(path);
        let content = fs::read_to_string(&full_path).unwrap_or_else(|e| {
            panic!("Failed to read {}: {e}", full_path.display())
        });
        assert!(
            content.contains(expected),
            "File {} does not contain {:?}.\nContent:\n{}",
            full_path.display(),
            expected,
            content
        );
    }
}
