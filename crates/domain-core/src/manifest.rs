//! Workspace manifest parsing for `.domains/config.toml`

use serde::{Deserialize, Serialize};

use crate::Result;

fn default_config_dir() -> String {
    "config".to_string()
}

fn default_store() -> String {
    ".domains/store.json".to_string()
}

fn default_sender() -> String {
    "no-reply@localhost".to_string()
}

fn default_base_url() -> String {
    "http://localhost".to_string()
}

fn default_outbox() -> String {
    ".domains/outbox.jsonl".to_string()
}

/// Where configurations and the store live, relative to the workspace root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSection {
    /// Directory holding `<organization>/<identifier>.json` configs
    #[serde(default = "default_config_dir")]
    pub config_dir: String,
    #[serde(default = "default_store")]
    pub store: String,
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            store: default_store(),
        }
    }
}

/// Outgoing notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSection {
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Prefix of links sent in notifications
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_outbox")]
    pub outbox: String,
}

impl Default for MailSection {
    fn default() -> Self {
        Self {
            sender: default_sender(),
            base_url: default_base_url(),
            outbox: default_outbox(),
        }
    }
}

/// Workspace manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub core: CoreSection,
    #[serde(default)]
    pub mail: MailSection,
}

impl Manifest {
    /// Parse a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use domain_core::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    /// [core]
    /// config_dir = "domains"
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.core.config_dir, "domains");
    /// assert_eq!(manifest.core.store, ".domains/store.json");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.mail.outbox, ".domains/outbox.jsonl");
    }

    #[test]
    fn mail_section_is_read() {
        let manifest = Manifest::parse(
            r#"
[mail]
sender = "admin@example.com"
base_url = "https://cms.example.com"
"#,
        )
        .unwrap();
        assert_eq!(manifest.mail.sender, "admin@example.com");
        assert_eq!(manifest.mail.base_url, "https://cms.example.com");
        assert_eq!(manifest.core.config_dir, "config");
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(Manifest::parse("[core\nconfig_dir = 1").is_err());
    }
}
