//! Reconciliation and administration of domain configurations
//!
//! This crate ties the lower layers together:
//!
//! - **Drift detection**: compare a stored domain with its filesystem config
//! - **Reconciliation flow**: seed, edit, validate, preview and commit an
//!   update, rolling back on every failed attempt
//! - **Validation**: rules every domain, member and invitation must satisfy
//! - **Stores**: staged, flush-to-commit persistence in memory or on disk
//! - **Services**: the admin operations on domains and memberships
//!
//! # Architecture
//!
//! ```text
//!                  domain-cli
//!                      |
//!                 domain-core
//!                      |
//!      +---------------+---------------+
//!      |               |               |
//!  domain-fs    domain-content    domain-meta
//! ```

pub mod drift;
pub mod error;
pub mod flow;
pub mod manifest;
pub mod notify;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;
pub mod workspace;

pub use drift::{DriftDetector, DriftResult};
pub use error::{Error, Result};
pub use flow::{
    EditSession, FieldError, FlowAction, FlowState, FlowWarning, PendingEdit, Preview,
    ReconciliationFlow, Step,
};
pub use manifest::Manifest;
pub use notify::{Notification, Notifier, OutboxNotifier, RecordingNotifier};
pub use report::{CheckStatus, DriftItem, DriftReport};
pub use service::{DomainIndex, DomainService, MemberListing, MembershipService, Outcome};
pub use store::{Change, FileStore, MemoryStore, Store, StoreState};
pub use validation::{
    DomainRules, ValidationContext, ValidationGroup, Validator, Violation,
};
pub use workspace::Workspace;
