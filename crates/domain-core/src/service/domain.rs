//! Domain administration: listing, creation, import, update, drift check
//! and removal

use domain_fs::{ConfigSource, DomainKey};
use domain_meta::{ConfigCodec, DomainEntity};

use super::Outcome;
use crate::drift::{DriftDetector, DriftResult};
use crate::flow::{EditSession, FieldError, PendingEdit, ReconciliationFlow, Step};
use crate::report::{DriftItem, DriftReport};
use crate::store::Store;
use crate::validation::{DomainRules, ValidationContext, ValidationGroup, Validator};
use crate::{Error, Result};

/// Title of the configuration offered when creating a domain
pub const SEED_TITLE: &str = "Untitled Domain";
/// Identifier of the configuration offered when creating a domain
pub const SEED_IDENTIFIER: &str = "untitled";

/// Domains of an organization
#[derive(Debug, Clone, PartialEq)]
pub struct DomainIndex {
    pub domains: Vec<DomainEntity>,
    /// Identifiers with a filesystem config but no domain yet
    pub missing: Vec<String>,
    pub warnings: Vec<String>,
}

pub struct DomainService<S, C, V = DomainRules> {
    codec: ConfigCodec,
    store: S,
    source: C,
    validator: V,
}

impl<S: Store, C: ConfigSource, V: Validator> DomainService<S, C, V> {
    pub fn new(store: S, source: C, validator: V) -> Self {
        Self {
            codec: ConfigCodec::new(),
            store,
            source,
            validator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    fn require_organization(&self, organization: &str) -> Result<()> {
        match self.store.organization(organization) {
            Some(_) => Ok(()),
            None => Err(Error::OrganizationNotFound {
                identifier: organization.to_string(),
            }),
        }
    }

    /// List domains, plus filesystem configs that could be imported.
    ///
    /// A failure to list the filesystem is reported as a warning.
    pub fn index(&self, organization: &str) -> Result<DomainIndex> {
        self.require_organization(organization)?;
        let domains: Vec<DomainEntity> =
            self.store.domains(organization).into_iter().cloned().collect();

        let mut warnings = Vec::new();
        let missing = match self.source.list_available(organization) {
            Ok(available) => available
                .into_iter()
                .filter(|id| !domains.iter().any(|d| &d.identifier == id))
                .collect(),
            Err(e) => {
                tracing::error!(organization, "Cannot list filesystem configs: {}", e);
                warnings.push(format!("Cannot list configuration files: {e}"));
                Vec::new()
            }
        };

        Ok(DomainIndex {
            domains,
            missing,
            warnings,
        })
    }

    /// Configuration the create form starts from.
    pub fn create_seed(&self) -> String {
        self.codec
            .serialize_pretty(&DomainEntity::new(SEED_TITLE, SEED_IDENTIFIER))
    }

    /// Configuration the create form starts from when importing a
    /// filesystem config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigSource`] if the config does not exist, cannot
    /// be read or is not a domain configuration.
    pub fn import_seed(&self, organization: &str, identifier: &str) -> Result<String> {
        self.require_organization(organization)?;
        let key = DomainKey::new(organization, identifier);
        let text = self
            .source
            .read_optional(&key)
            .map_err(|e| Error::config_source(&key, e.to_string()))?
            .ok_or_else(|| Error::config_source(&key, "no configuration file found"))?;

        self.codec
            .parse(&text)
            .map_err(|e| Error::config_source(&key, e.message))?;
        Ok(text)
    }

    /// Create a domain from configuration text and write its config file.
    pub fn create(&mut self, organization: &str, text: &str) -> Result<Outcome<DomainEntity>> {
        self.require_organization(organization)?;

        let mut domain = match self.codec.parse(text) {
            Ok(domain) => domain.with_organization(organization),
            Err(e) => {
                tracing::debug!(organization, "Rejected unparsable config: {}", e);
                return Ok(Outcome::Rejected(vec![FieldError::parse_failure()]));
            }
        };

        let context = ValidationContext::new(ValidationGroup::Default).with_taken_identifiers(
            self.store
                .domains(organization)
                .into_iter()
                .map(|d| d.identifier.clone()),
        );
        let violations = self.validator.validate(&domain, &context);
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        self.store.persist(&domain);
        self.store.flush()?;
        tracing::info!(domain = %domain.key(), "Domain created");

        self.write_config(&domain)?;
        domain.clear_config_changed();
        Ok(Outcome::Done(domain))
    }

    pub fn view(&self, organization: &str, identifier: &str) -> Result<&DomainEntity> {
        self.store
            .find_domain(organization, identifier)
            .ok_or_else(|| Error::domain_not_found(organization, identifier))
    }

    /// Start updating a domain from its filesystem config.
    pub fn begin_update(&mut self, organization: &str, identifier: &str) -> Result<EditSession> {
        let domain = self.view(organization, identifier)?.clone();
        let key = domain.key();
        let filesystem = self
            .source
            .read_optional(&key)
            .map_err(|e| Error::config_source(&key, e.to_string()))?;

        ReconciliationFlow::new(self.codec, &self.validator, &mut self.store)
            .begin(domain, filesystem.as_deref())
    }

    /// Apply one edit; on commit, write the config file if it changed or
    /// does not exist yet.
    pub fn apply_update(&mut self, session: &mut EditSession, edit: &PendingEdit) -> Result<Step> {
        let step = ReconciliationFlow::new(self.codec, &self.validator, &mut self.store)
            .apply(session, edit)?;

        if let Step::Committed(domain) = &step
            && (domain.is_config_changed() || !self.source.exists(&domain.key()))
        {
            self.write_config(domain)?;
        }
        Ok(step)
    }

    /// Compare every domain of the organization with its filesystem config.
    pub fn check(&self, organization: &str) -> Result<DriftReport> {
        self.require_organization(organization)?;
        let detector = DriftDetector::new(self.codec);
        let mut report = DriftReport::healthy();

        for domain in self.store.domains(organization) {
            let key = domain.key();
            let item = |description: String| DriftItem::new(key.to_string(), description);

            let text = match self.source.read_optional(&key) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(domain = %key, "Cannot read config: {}", e);
                    report = report.merge(DriftReport::with_broken(item(e.to_string())));
                    continue;
                }
            };

            let next = match detector.detect(domain, text.as_deref()) {
                Ok(DriftResult::NoDrift) => DriftReport::healthy(),
                Ok(DriftResult::MissingOnFilesystem) => {
                    DriftReport::with_missing(item("no configuration file".to_string()))
                }
                Ok(DriftResult::Drift { filesystem_config }) => {
                    let mut drifted = item("configuration file differs from stored domain".to_string());
                    drifted.changes = detector
                        .describe(domain, &filesystem_config)
                        .changes
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    DriftReport::with_drifted(drifted)
                }
                Err(e) => DriftReport::with_broken(item(e.to_string())),
            };
            report = report.merge(next);
        }

        match self.source.list_available(organization) {
            Ok(available) => report.unimported.extend(
                available
                    .into_iter()
                    .filter(|id| self.store.find_domain(organization, id).is_none()),
            ),
            Err(e) => report
                .messages
                .push(format!("Cannot list configuration files: {e}")),
        }

        Ok(report)
    }

    /// Remove a domain that has no members and no pending invitations.
    ///
    /// The filesystem config is kept.
    pub fn delete(&mut self, organization: &str, identifier: &str) -> Result<Outcome<DomainEntity>> {
        let domain = self.view(organization, identifier)?.clone();

        let mut context = ValidationContext::new(ValidationGroup::Delete);
        context.member_count = self.store.members(organization, identifier, None).len();
        context.invitation_count = self.store.invitations(organization, identifier, None).len();
        let violations = self.validator.validate(&domain, &context);
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        self.store.remove(&domain);
        self.store.flush()?;
        tracing::info!(domain = %domain.key(), "Domain deleted");
        Ok(Outcome::Done(domain))
    }

    fn write_config(&mut self, domain: &DomainEntity) -> Result<()> {
        let key = domain.key();
        self.source.write(&key, &domain.config).map_err(|e| {
            tracing::error!(domain = %key, "Domain saved but its config file was not written: {}", e);
            Error::config_source(&key, e.to_string())
        })
    }
}
