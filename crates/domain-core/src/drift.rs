//! Drift between a persisted domain and its filesystem configuration
//!
//! Both sides are compared through [`ConfigCodec::serialize`], so
//! indentation, key order and `variables` indirection in the file never
//! count as drift.

use domain_content::SemanticDiff;
use domain_meta::{ConfigCodec, ConfigParseError, DomainEntity};
use serde_json::Value;

/// Outcome of comparing a persisted domain with its filesystem configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftResult {
    /// Both sides serialize identically
    NoDrift,
    /// The filesystem configuration differs; carries its canonical text
    Drift { filesystem_config: String },
    /// No configuration exists on the filesystem
    MissingOnFilesystem,
}

impl DriftResult {
    pub fn is_drift(&self) -> bool {
        matches!(self, Self::Drift { .. })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DriftDetector {
    codec: ConfigCodec,
}

impl DriftDetector {
    pub fn new(codec: ConfigCodec) -> Self {
        Self { codec }
    }

    /// Compare `persisted` with the raw filesystem text, if any.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the filesystem text is not a valid
    /// domain configuration. Callers treat that as a broken config source.
    pub fn detect(
        &self,
        persisted: &DomainEntity,
        filesystem: Option<&str>,
    ) -> Result<DriftResult, ConfigParseError> {
        let Some(text) = filesystem else {
            return Ok(DriftResult::MissingOnFilesystem);
        };

        let candidate = self.codec.parse(text)?;
        let persisted_config = self.codec.serialize(persisted);
        let filesystem_config = self.codec.serialize(&candidate);

        if persisted_config == filesystem_config {
            Ok(DriftResult::NoDrift)
        } else {
            tracing::debug!(
                domain = %persisted.key(),
                "Filesystem config differs from persisted domain"
            );
            Ok(DriftResult::Drift { filesystem_config })
        }
    }

    /// Path-level differences between the persisted domain and a canonical
    /// filesystem config, for display.
    pub fn describe(&self, persisted: &DomainEntity, filesystem_config: &str) -> SemanticDiff {
        let old = self.codec.to_value(persisted);
        match serde_json::from_str::<Value>(filesystem_config) {
            Ok(new) => SemanticDiff::compute(&old, &new),
            Err(e) => {
                tracing::warn!("Cannot describe drift of unparsable config: {}", e);
                SemanticDiff::compute(&old, &Value::Null)
            }
        }
    }
}
