//! Admin operations on domains and their memberships

mod domain;
mod membership;

pub use domain::{DomainIndex, DomainService};
pub use membership::{MemberListing, MembershipService, accept_url, generate_token};

use crate::flow::FieldError;
use crate::validation::Violation;

/// Result of an operation whose input may be rejected
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Done(T),
    /// Nothing was saved
    Rejected(Vec<FieldError>),
}

impl<T> Outcome<T> {
    pub(crate) fn rejected(violations: &[Violation]) -> Self {
        Self::Rejected(violations.iter().map(FieldError::from).collect())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Done(_) => &[],
            Self::Rejected(errors) => errors,
        }
    }

    pub fn done(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }
}
