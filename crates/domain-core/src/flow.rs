//! Reconciliation of a persisted domain with its filesystem configuration
//!
//! An update runs as a small state machine over an [`EditSession`]:
//!
//! ```text
//! Seeding -> Editing -> Validating -> AwaitingConfirmation -> Committed
//!               ^            |                 |
//!               +-- Failed <-+                 |
//!               +------------- Back -----------+
//! ```
//!
//! [`ReconciliationFlow::begin`] seeds the session from the filesystem
//! (or synthesizes the config when there is none). Each [`PendingEdit`] is
//! then applied with [`ReconciliationFlow::apply`]. Nothing reaches the store
//! until a `Confirm` follows a violation-free `Submit`, and every failed
//! attempt restores the entity to the snapshot taken when the session began.

use domain_content::{SemanticDiff, migrate_legacy_variables};
use domain_meta::{ConfigCodec, DomainEntity};

use crate::drift::{DriftDetector, DriftResult};
use crate::store::Store;
use crate::validation::{ValidationContext, ValidationGroup, Validator, Violation};
use crate::{Error, Result};

/// Message shown when submitted text is not a domain configuration
pub const PARSE_ERROR_MESSAGE: &str = "Could not parse domain definition JSON.";

/// Field path parse errors are reported on
pub const DOMAIN_FIELD: &str = "domain";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    /// Validate the edited text and preview the result
    Submit,
    /// Save the previewed result
    Confirm,
    /// Discard the preview and return to editing
    Back,
}

impl std::fmt::Display for FlowAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => write!(f, "submit"),
            Self::Confirm => write!(f, "confirm"),
            Self::Back => write!(f, "go back"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Seeding,
    Editing,
    Validating,
    AwaitingConfirmation,
    Committed,
    Failed,
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Seeding => "seeding",
            Self::Editing => "editing",
            Self::Validating => "validating",
            Self::AwaitingConfirmation => "awaiting confirmation",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Non-fatal conditions found while seeding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowWarning {
    /// The filesystem config differs from the stored domain
    Drift,
    /// No filesystem config exists; one was generated
    MissingOnFilesystem,
}

impl std::fmt::Display for FlowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drift => write!(
                f,
                "The configuration on the filesystem differs from the stored domain. \
                 The editor shows the filesystem version; saving replaces the stored domain."
            ),
            Self::MissingOnFilesystem => write!(
                f,
                "No configuration file exists for this domain. \
                 One was generated from the stored domain and is written on save."
            ),
        }
    }
}

/// An error attached to a field of the edited configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn parse_failure() -> Self {
        Self::new(DOMAIN_FIELD, PARSE_ERROR_MESSAGE)
    }
}

impl From<&Violation> for FieldError {
    /// The message is prefixed with the property path so it stays
    /// meaningful when shown away from the field.
    fn from(violation: &Violation) -> Self {
        Self::new(violation.property_path.clone(), violation.to_string())
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Edited configuration text plus what to do with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
    pub text: String,
    pub action: FlowAction,
}

impl PendingEdit {
    pub fn new(text: impl Into<String>, action: FlowAction) -> Self {
        Self {
            text: text.into(),
            action,
        }
    }

    pub fn submit(text: impl Into<String>) -> Self {
        Self::new(text, FlowAction::Submit)
    }

    /// Confirm carries no text: the previewed result is what gets saved.
    pub fn confirm() -> Self {
        Self::new(String::new(), FlowAction::Confirm)
    }

    pub fn back() -> Self {
        Self::new(String::new(), FlowAction::Back)
    }
}

/// A validated update waiting for confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub original: DomainEntity,
    pub updated: DomainEntity,
    pub changes: SemanticDiff,
}

/// Result of applying one [`PendingEdit`]
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Validation passed; editing is disabled until confirmed or reverted
    Preview(Box<Preview>),
    /// The text was rejected; the entity is back at its snapshot
    Rejected(Vec<FieldError>),
    /// The preview was discarded
    Reverted,
    /// The entity was persisted
    Committed(Box<DomainEntity>),
}

/// State of one update of one domain
#[derive(Debug, Clone)]
pub struct EditSession {
    entity: DomainEntity,
    snapshot: DomainEntity,
    state: FlowState,
    drift: DriftResult,
    seed: String,
    warnings: Vec<FlowWarning>,
    errors: Vec<FieldError>,
}

impl EditSession {
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// The working entity.
    pub fn entity(&self) -> &DomainEntity {
        &self.entity
    }

    /// The entity as it was when the session began.
    pub fn snapshot(&self) -> &DomainEntity {
        &self.snapshot
    }

    pub fn drift(&self) -> &DriftResult {
        &self.drift
    }

    /// Text the editor starts from.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn warnings(&self) -> &[FlowWarning] {
        &self.warnings
    }

    /// Errors of the last rejected submit.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether the editor should be read-only (a preview is shown).
    pub fn fields_disabled(&self) -> bool {
        self.state == FlowState::AwaitingConfirmation
    }

    pub fn into_entity(self) -> DomainEntity {
        self.entity
    }

    fn transition(&mut self, next: FlowState) {
        tracing::debug!(
            domain = %self.snapshot.key(),
            from = %self.state,
            to = %next,
            "Reconciliation flow transition"
        );
        self.state = next;
    }

    fn restore(&mut self) {
        self.entity = self.snapshot.clone();
    }
}

/// Drives [`EditSession`]s against a validator and a store
pub struct ReconciliationFlow<'a, V, S> {
    codec: ConfigCodec,
    validator: &'a V,
    store: &'a mut S,
}

impl<'a, V: Validator, S: Store> ReconciliationFlow<'a, V, S> {
    pub fn new(codec: ConfigCodec, validator: &'a V, store: &'a mut S) -> Self {
        Self {
            codec,
            validator,
            store,
        }
    }

    /// Start updating `entity`, given the raw filesystem config if one exists.
    ///
    /// Without a filesystem config, one is synthesized from the entity (with
    /// legacy variables folded back in) and the entity is marked changed.
    /// Otherwise drift is detected: on drift the editor is seeded with the
    /// filesystem's canonical config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigSource`] if the filesystem config is not a
    /// valid domain configuration; `entity` is not modified in that case.
    pub fn begin(&self, mut entity: DomainEntity, filesystem: Option<&str>) -> Result<EditSession> {
        let key = entity.key();
        let mut warnings = Vec::new();

        let drift = match filesystem {
            None => {
                let serialized = self.codec.serialize(&entity);
                let config = if entity.config_variables.is_empty() {
                    serialized
                } else {
                    migrate_legacy_variables(&serialized, &entity.config_variables)?
                };
                entity.set_config(config);
                entity.mark_config_changed();
                tracing::warn!(domain = %key, "No filesystem config, generated one from the stored domain");
                warnings.push(FlowWarning::MissingOnFilesystem);
                DriftResult::MissingOnFilesystem
            }
            Some(text) => {
                let drift = DriftDetector::new(self.codec)
                    .detect(&entity, Some(text))
                    .map_err(|e| Error::config_source(&key, e.message))?;
                entity.config = text.to_string();
                if drift.is_drift() {
                    tracing::warn!(domain = %key, "Filesystem config has drifted from the stored domain");
                    warnings.push(FlowWarning::Drift);
                }
                drift
            }
        };

        let seed = match &drift {
            DriftResult::Drift { filesystem_config } => filesystem_config.clone(),
            _ => entity.config.clone(),
        };

        let mut session = EditSession {
            snapshot: entity.clone(),
            entity,
            state: FlowState::Seeding,
            drift,
            seed,
            warnings,
            errors: Vec::new(),
        };
        session.transition(FlowState::Editing);
        Ok(session)
    }

    /// Apply one edit to the session.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidTransition`] for `Confirm` without a preview, or
    ///   any action after the session committed
    /// - [`Error::Persistence`] when the store fails to save on `Confirm`
    pub fn apply(&mut self, session: &mut EditSession, edit: &PendingEdit) -> Result<Step> {
        if session.state == FlowState::Committed {
            return Err(Error::InvalidTransition {
                state: session.state,
                action: edit.action,
            });
        }

        match edit.action {
            FlowAction::Submit => self.submit(session, &edit.text),
            FlowAction::Confirm => self.confirm(session),
            FlowAction::Back => Ok(self.back(session)),
        }
    }

    fn submit(&mut self, session: &mut EditSession, text: &str) -> Result<Step> {
        session.transition(FlowState::Validating);
        session.errors.clear();

        let candidate = match self.codec.parse(text) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::debug!(domain = %session.snapshot.key(), "Rejected unparsable config: {}", e);
                session.restore();
                session.errors = vec![FieldError::parse_failure()];
                session.transition(FlowState::Failed);
                return Ok(Step::Rejected(session.errors.clone()));
            }
        };

        session.restore();
        session.entity.apply_from(&candidate);

        let context = self.context_for(&session.entity);
        let violations = self.validator.validate(&session.entity, &context);
        if !violations.is_empty() {
            session.errors = violations.iter().map(FieldError::from).collect();
            session.restore();
            session.transition(FlowState::Editing);
            return Ok(Step::Rejected(session.errors.clone()));
        }

        let changes = SemanticDiff::compute(
            &self.codec.to_value(&session.snapshot),
            &self.codec.to_value(&session.entity),
        );
        session.transition(FlowState::AwaitingConfirmation);
        Ok(Step::Preview(Box::new(Preview {
            original: session.snapshot.clone(),
            updated: session.entity.clone(),
            changes,
        })))
    }

    fn confirm(&mut self, session: &mut EditSession) -> Result<Step> {
        if session.state != FlowState::AwaitingConfirmation {
            return Err(Error::InvalidTransition {
                state: session.state,
                action: FlowAction::Confirm,
            });
        }

        // The committed config carries any legacy variables inline.
        session.entity.config_variables.clear();
        self.store.persist(&session.entity);
        if let Err(e) = self.store.flush() {
            session.restore();
            session.transition(FlowState::Failed);
            return Err(e);
        }

        session.transition(FlowState::Committed);
        tracing::info!(domain = %session.entity.key(), "Domain updated");
        Ok(Step::Committed(Box::new(session.entity.clone())))
    }

    fn back(&self, session: &mut EditSession) -> Step {
        session.restore();
        session.errors.clear();
        session.transition(FlowState::Editing);
        Step::Reverted
    }

    fn context_for(&self, entity: &DomainEntity) -> ValidationContext {
        ValidationContext::new(ValidationGroup::Default).with_taken_identifiers(
            self.store
                .domains(&entity.organization)
                .into_iter()
                .filter(|d| d.id != entity.id)
                .map(|d| d.identifier.clone()),
        )
    }
}
