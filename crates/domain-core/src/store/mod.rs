//! Entity stores
//!
//! A store keeps organizations, domains, members and invitations. Writes are
//! staged as [`Change`]s and only become visible to reads after a successful
//! [`Store::flush`]; a failed flush discards everything staged since the
//! last one, so callers never observe a half-applied operation.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use domain_meta::{DomainEntity, DomainInvitation, DomainMember, Organization};
use uuid::Uuid;

use crate::Result;

/// A staged write
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    PersistDomain(DomainEntity),
    RemoveDomain(Uuid),
    SaveOrganization(Organization),
    PersistMember(DomainMember),
    RemoveMember(Uuid),
    PersistInvitation(DomainInvitation),
    RemoveInvitation(Uuid),
}

/// Committed contents of a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub organizations: BTreeMap<String, Organization>,
    pub domains: Vec<DomainEntity>,
    pub members: Vec<DomainMember>,
    pub invitations: Vec<DomainInvitation>,
}

impl StoreState {
    /// Apply one change in place.
    pub fn apply(&mut self, change: Change) {
        match change {
            Change::PersistDomain(mut domain) => {
                domain.clear_config_changed();
                match self.domains.iter().position(|d| d.id == domain.id) {
                    Some(index) => {
                        let existing = &self.domains[index];
                        if existing.identifier != domain.identifier {
                            let organization = existing.organization.clone();
                            let from = existing.identifier.clone();
                            self.rename_domain(&organization, &from, &domain.identifier);
                        }
                        self.domains[index] = domain;
                    }
                    None => self.domains.push(domain),
                }
            }
            Change::RemoveDomain(id) => self.domains.retain(|d| d.id != id),
            Change::SaveOrganization(organization) => {
                self.organizations
                    .insert(organization.identifier.clone(), organization);
            }
            Change::PersistMember(member) => {
                match self.members.iter_mut().find(|m| m.id == member.id) {
                    Some(existing) => *existing = member,
                    None => self.members.push(member),
                }
            }
            Change::RemoveMember(id) => self.members.retain(|m| m.id != id),
            Change::PersistInvitation(invitation) => {
                match self.invitations.iter_mut().find(|i| i.id == invitation.id) {
                    Some(existing) => *existing = invitation,
                    None => self.invitations.push(invitation),
                }
            }
            Change::RemoveInvitation(id) => self.invitations.retain(|i| i.id != id),
        }
    }

    /// Members and invitations follow their domain when its identifier changes.
    fn rename_domain(&mut self, organization: &str, from: &str, to: &str) {
        for member in &mut self.members {
            if member.organization == organization && member.domain == from {
                member.domain = to.to_string();
            }
        }
        for invitation in &mut self.invitations {
            if invitation.organization == organization && invitation.domain == from {
                invitation.domain = to.to_string();
            }
        }
    }
}

/// Persistence of domains and their memberships
pub trait Store {
    /// Committed contents.
    fn state(&self) -> &StoreState;

    /// Stage a change for the next flush.
    fn stage(&mut self, change: Change);

    /// Changes staged since the last flush.
    fn pending(&self) -> &[Change];

    /// Commit all staged changes.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the changes cannot be saved; the
    /// staged changes are discarded in that case.
    fn flush(&mut self) -> Result<()>;

    fn persist(&mut self, domain: &DomainEntity) {
        self.stage(Change::PersistDomain(domain.clone()));
    }

    fn remove(&mut self, domain: &DomainEntity) {
        self.stage(Change::RemoveDomain(domain.id));
    }

    fn organizations(&self) -> Vec<&Organization> {
        self.state().organizations.values().collect()
    }

    fn organization(&self, identifier: &str) -> Option<&Organization> {
        self.state().organizations.get(identifier)
    }

    fn save_organization(&mut self, organization: Organization) {
        self.stage(Change::SaveOrganization(organization));
    }

    /// Domains of an organization, ordered by title.
    fn domains(&self, organization: &str) -> Vec<&DomainEntity> {
        let mut domains: Vec<_> = self
            .state()
            .domains
            .iter()
            .filter(|d| d.organization == organization)
            .collect();
        domains.sort_by(|a, b| a.title.cmp(&b.title));
        domains
    }

    fn find_domain(&self, organization: &str, identifier: &str) -> Option<&DomainEntity> {
        self.state()
            .domains
            .iter()
            .find(|d| d.organization == organization && d.identifier == identifier)
    }

    /// Members of a domain, optionally restricted to one member type.
    fn members(&self, organization: &str, domain: &str, member_type: Option<&str>) -> Vec<&DomainMember> {
        self.state()
            .members
            .iter()
            .filter(|m| m.organization == organization && m.domain == domain)
            .filter(|m| member_type.is_none_or(|t| m.member_type == t))
            .collect()
    }

    fn persist_member(&mut self, member: &DomainMember) {
        self.stage(Change::PersistMember(member.clone()));
    }

    fn remove_member(&mut self, id: Uuid) {
        self.stage(Change::RemoveMember(id));
    }

    fn invitations(
        &self,
        organization: &str,
        domain: &str,
        member_type: Option<&str>,
    ) -> Vec<&DomainInvitation> {
        self.state()
            .invitations
            .iter()
            .filter(|i| i.organization == organization && i.domain == domain)
            .filter(|i| member_type.is_none_or(|t| i.member_type == t))
            .collect()
    }

    fn persist_invitation(&mut self, invitation: &DomainInvitation) {
        self.stage(Change::PersistInvitation(invitation.clone()));
    }

    fn remove_invitation(&mut self, id: Uuid) {
        self.stage(Change::RemoveInvitation(id));
    }
}
