//! Organizations, domain members and invitations

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use domain_meta::{
    Accessor, ApiKey, DomainEntity, DomainInvitation, DomainMember,
    DomainMemberType, Organization, User,
};
use rand::{RngCore, rngs::OsRng};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::Outcome;
use crate::flow::FieldError;
use crate::notify::{INVITATION_TEMPLATE, Notifier};
use crate::store::Store;
use crate::validation::{
    IDENTIFIER_PATTERN, Violation, validate_email, validate_member_data, validate_member_roles,
};
use crate::{Error, Result};

/// Random bytes in an invitation token
const TOKEN_BYTES: usize = 32;

/// A fresh URL-safe invitation token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Link an invitee follows to accept an invitation.
pub fn accept_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/profile/accept-invitation?token={}",
        base_url.trim_end_matches('/'),
        token
    )
}

/// Members and open invitations of one member type
#[derive(Debug, Clone, PartialEq)]
pub struct MemberListing {
    pub member_type: DomainMemberType,
    pub members: Vec<DomainMember>,
    pub invitations: Vec<DomainInvitation>,
}

pub struct MembershipService<S, N> {
    store: S,
    notifier: N,
    base_url: String,
}

impl<S: Store, N: Notifier> MembershipService<S, N> {
    pub fn new(store: S, notifier: N, base_url: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            base_url: base_url.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn organization(&self, identifier: &str) -> Result<&Organization> {
        self.store
            .organization(identifier)
            .ok_or_else(|| Error::OrganizationNotFound {
                identifier: identifier.to_string(),
            })
    }

    fn domain(&self, organization: &str, domain: &str) -> Result<&DomainEntity> {
        self.store
            .find_domain(organization, domain)
            .ok_or_else(|| Error::domain_not_found(organization, domain))
    }

    fn member_type(&self, organization: &str, domain: &str, member_type: &str) -> Result<&DomainMemberType> {
        Ok(self.domain(organization, domain)?.require_member_type(member_type)?)
    }

    // Organizations

    pub fn add_organization(&mut self, identifier: &str, title: &str) -> Result<Outcome<Organization>> {
        let mut violations = Vec::new();
        if !IDENTIFIER_PATTERN.is_match(identifier) {
            violations.push(Violation::new(
                "identifier",
                "Only lowercase letters, digits and underscores are allowed.",
            ));
        } else if self.store.organization(identifier).is_some() {
            violations.push(Violation::new("identifier", "This identifier is already taken."));
        }
        if title.trim().is_empty() {
            violations.push(Violation::new("title", "This value should not be blank."));
        }
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        let organization = Organization::new(identifier, title);
        self.store.save_organization(organization.clone());
        self.store.flush()?;
        tracing::info!(organization = identifier, "Organization added");
        Ok(Outcome::Done(organization))
    }

    pub fn add_user(&mut self, organization: &str, email: &str, name: &str) -> Result<Outcome<User>> {
        let mut updated = self.organization(organization)?.clone();

        let mut violations = validate_email(email);
        if updated.user_by_email(email).is_some() {
            violations.push(Violation::new("email", "This user is already a member."));
        }
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        let user = User::new(email, name);
        updated.members.push(user.clone());
        self.store.save_organization(updated);
        self.store.flush()?;
        Ok(Outcome::Done(user))
    }

    pub fn add_api_key(&mut self, organization: &str, name: &str) -> Result<Outcome<ApiKey>> {
        let mut updated = self.organization(organization)?.clone();

        if name.trim().is_empty() {
            return Ok(Outcome::rejected(&[Violation::new(
                "name",
                "This value should not be blank.",
            )]));
        }
        if updated.api_key_by_name(name).is_some() {
            return Ok(Outcome::rejected(&[Violation::new(
                "name",
                "An API key with this name already exists.",
            )]));
        }

        let key = ApiKey::new(name);
        updated.api_keys.push(key.clone());
        self.store.save_organization(updated);
        self.store.flush()?;
        Ok(Outcome::Done(key))
    }

    // Members

    pub fn list(&self, organization: &str, domain: &str, member_type: &str) -> Result<MemberListing> {
        let member_type = self.member_type(organization, domain, member_type)?.clone();
        let members = self
            .store
            .members(organization, domain, Some(&member_type.identifier))
            .into_iter()
            .cloned()
            .collect();
        let invitations = self
            .store
            .invitations(organization, domain, Some(&member_type.identifier))
            .into_iter()
            .cloned()
            .collect();

        Ok(MemberListing {
            member_type,
            members,
            invitations,
        })
    }

    /// API keys and users of the organization that are not yet members of
    /// this member type, API keys first.
    pub fn candidates(&self, organization: &str, domain: &str, member_type: &str) -> Result<Vec<Accessor>> {
        self.member_type(organization, domain, member_type)?;
        let org = self.organization(organization)?;
        let existing: Vec<Uuid> = self
            .store
            .members(organization, domain, Some(member_type))
            .iter()
            .map(|m| m.accessor.id)
            .collect();

        let keys = org.api_keys.iter().map(Accessor::of);
        let users = org.members.iter().map(Accessor::of);
        Ok(keys
            .chain(users)
            .filter(|accessor| !existing.contains(&accessor.id))
            .collect())
    }

    pub fn add_member(
        &mut self,
        organization: &str,
        domain: &str,
        member_type: &str,
        accessor: Uuid,
        roles: Vec<String>,
    ) -> Result<Outcome<DomainMember>> {
        let candidates = self.candidates(organization, domain, member_type)?;
        let Some(accessor) = candidates.into_iter().find(|a| a.id == accessor) else {
            return Ok(Outcome::Rejected(vec![FieldError::new(
                "accessor",
                "accessor: This accessor cannot be added to this member type.",
            )]));
        };

        let violations = validate_member_roles(self.domain(organization, domain)?, &roles);
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        let mut member = DomainMember::new(organization, domain, member_type, accessor);
        member.roles = roles;
        self.store.persist_member(&member);
        self.store.flush()?;
        tracing::info!(
            domain = %format!("{organization}/{domain}"),
            member = %member.accessor.label,
            "Member added"
        );
        Ok(Outcome::Done(member))
    }

    /// Invite someone by email and notify them.
    ///
    /// The invitation is saved even if the notification fails; the failure
    /// is logged.
    pub fn invite(
        &mut self,
        organization: &str,
        domain: &str,
        member_type: &str,
        email: &str,
        roles: Vec<String>,
    ) -> Result<Outcome<DomainInvitation>> {
        self.member_type(organization, domain, member_type)?;
        let domain_entity = self.domain(organization, domain)?;
        let domain_title = domain_entity.title.clone();

        let mut violations = validate_email(email);
        violations.extend(validate_member_roles(domain_entity, &roles));
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        let invitation = DomainInvitation {
            id: Uuid::new_v4(),
            organization: organization.to_string(),
            domain: domain.to_string(),
            member_type: member_type.to_string(),
            email: email.to_string(),
            roles,
            token: generate_token(),
            requested_at: Utc::now(),
        };
        self.store.persist_invitation(&invitation);
        self.store.flush()?;

        let organization_title = self.organization(organization)?.title.clone();
        let data = json!({
            "organization": organization_title,
            "domain": domain_title,
            "member_type": member_type,
            "accept_url": accept_url(&self.base_url, &invitation.token),
        });
        if let Err(e) = self.notifier.send(email, INVITATION_TEMPLATE, data) {
            tracing::error!(recipient = email, "Could not send invitation: {}", e);
        }

        Ok(Outcome::Done(invitation))
    }

    /// Change a member's roles and/or data.
    pub fn update_member(
        &mut self,
        organization: &str,
        domain: &str,
        member_type: &str,
        member_id: Uuid,
        roles: Option<Vec<String>>,
        data: Option<Map<String, Value>>,
    ) -> Result<Outcome<DomainMember>> {
        let member_type_def = self.member_type(organization, domain, member_type)?;
        let mut member = self.find_member(organization, domain, member_type, member_id)?;

        if let Some(roles) = roles {
            member.roles = roles;
        }
        if let Some(data) = data {
            member.data = data;
        }

        let mut violations = validate_member_roles(self.domain(organization, domain)?, &member.roles);
        violations.extend(validate_member_data(member_type_def, &member.data));
        if !violations.is_empty() {
            return Ok(Outcome::rejected(&violations));
        }

        self.store.persist_member(&member);
        self.store.flush()?;
        Ok(Outcome::Done(member))
    }

    pub fn remove_member(
        &mut self,
        organization: &str,
        domain: &str,
        member_type: &str,
        member_id: Uuid,
    ) -> Result<DomainMember> {
        let member = self.find_member(organization, domain, member_type, member_id)?;
        self.store.remove_member(member.id);
        self.store.flush()?;
        tracing::info!(member = %member.accessor.label, "Member removed");
        Ok(member)
    }

    pub fn delete_invite(
        &mut self,
        organization: &str,
        domain: &str,
        member_type: &str,
        invitation_id: Uuid,
    ) -> Result<DomainInvitation> {
        self.member_type(organization, domain, member_type)?;
        let invitation = self
            .store
            .invitations(organization, domain, Some(member_type))
            .into_iter()
            .find(|i| i.id == invitation_id)
            .cloned()
            .ok_or_else(|| Error::InvitationNotFound {
                id: invitation_id.to_string(),
            })?;

        self.store.remove_invitation(invitation.id);
        self.store.flush()?;
        Ok(invitation)
    }

    fn find_member(
        &self,
        organization: &str,
        domain: &str,
        member_type: &str,
        member_id: Uuid,
    ) -> Result<DomainMember> {
        self.member_type(organization, domain, member_type)?;
        self.store
            .members(organization, domain, Some(member_type))
            .into_iter()
            .find(|m| m.id == member_id)
            .cloned()
            .ok_or_else(|| Error::MemberNotFound {
                id: member_id.to_string(),
            })
    }
}
