//! Validation of domains, members and invitations
//!
//! Validators never fail; they return the list of [`Violation`]s found,
//! each tied to the property path it concerns (`content_types[1].identifier`).

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use domain_meta::{DomainEntity, DomainMemberType, FieldDef, ViewDef};
use regex::Regex;
use serde_json::{Map, Value};

/// Identifiers of domains, types, fields and views
pub static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

pub static ROLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ROLE_[A-Z0-9_]+$").unwrap());

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_IDENTIFIER_LENGTH: usize = 200;

pub const DOMAIN_PERMISSIONS: &[&str] = &["view domain", "update domain"];
pub const CONTENT_PERMISSIONS: &[&str] = &[
    "view content",
    "list content",
    "create content",
    "update content",
    "delete content",
    "translate content",
];
pub const SETTING_PERMISSIONS: &[&str] = &["view setting", "update setting"];

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub property_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.property_path, self.message)
    }
}

/// Which set of rules to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationGroup {
    /// Rules for creating and updating
    #[default]
    Default,
    /// Rules for removal
    Delete,
}

/// What a validator knows about the domain's surroundings
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub group: ValidationGroup,
    /// Identifiers already used by other domains of the organization
    pub taken_identifiers: HashSet<String>,
    pub member_count: usize,
    pub invitation_count: usize,
}

impl ValidationContext {
    pub fn new(group: ValidationGroup) -> Self {
        Self {
            group,
            ..Self::default()
        }
    }

    pub fn with_taken_identifiers<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken_identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }
}

/// Checks a domain entity
pub trait Validator {
    fn validate(&self, entity: &DomainEntity, context: &ValidationContext) -> Vec<Violation>;
}

/// The built-in domain rules
#[derive(Debug, Default, Clone, Copy)]
pub struct DomainRules;

impl Validator for DomainRules {
    fn validate(&self, entity: &DomainEntity, context: &ValidationContext) -> Vec<Violation> {
        let mut violations = Vec::new();

        if context.group == ValidationGroup::Delete {
            if context.member_count > 0 {
                violations.push(Violation::new(
                    "members",
                    "Domain has members. Remove them before deleting the domain.",
                ));
            }
            if context.invitation_count > 0 {
                violations.push(Violation::new(
                    "invites",
                    "Domain has pending invitations. Delete them before deleting the domain.",
                ));
            }
            return violations;
        }

        check_title(&entity.title, "title", &mut violations);
        check_identifier(&entity.identifier, "identifier", &mut violations);
        if context.taken_identifiers.contains(&entity.identifier) {
            violations.push(Violation::new(
                "identifier",
                "This identifier is already taken.",
            ));
        }

        check_domain_roles(&entity.roles, &mut violations);
        check_permissions(&entity.permissions, DOMAIN_PERMISSIONS, "permissions", &mut violations);

        let mut seen = HashSet::new();
        for (i, content_type) in entity.content_types.iter().enumerate() {
            let path = format!("content_types[{i}]");
            check_title(&content_type.title, &format!("{path}.title"), &mut violations);
            check_unique_identifier(&content_type.identifier, &path, &mut seen, &mut violations);
            check_fields(&content_type.fields, &path, &mut violations);
            check_views(&content_type.views, &path, &mut violations);
            check_permissions(
                &content_type.permissions,
                CONTENT_PERMISSIONS,
                &format!("{path}.permissions"),
                &mut violations,
            );
        }

        let mut seen = HashSet::new();
        for (i, setting_type) in entity.setting_types.iter().enumerate() {
            let path = format!("setting_types[{i}]");
            check_title(&setting_type.title, &format!("{path}.title"), &mut violations);
            check_unique_identifier(&setting_type.identifier, &path, &mut seen, &mut violations);
            check_fields(&setting_type.fields, &path, &mut violations);
            check_permissions(
                &setting_type.permissions,
                SETTING_PERMISSIONS,
                &format!("{path}.permissions"),
                &mut violations,
            );
        }

        let mut seen = HashSet::new();
        for (i, member_type) in entity.domain_member_types.iter().enumerate() {
            let path = format!("domain_member_types[{i}]");
            check_title(&member_type.title, &format!("{path}.title"), &mut violations);
            check_unique_identifier(&member_type.identifier, &path, &mut seen, &mut violations);
            check_fields(&member_type.fields, &path, &mut violations);
        }

        violations
    }
}

fn check_title(title: &str, path: &str, violations: &mut Vec<Violation>) {
    if title.trim().is_empty() {
        violations.push(Violation::new(path, "This value should not be blank."));
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        violations.push(Violation::new(
            path,
            format!("This value is too long. It should have {MAX_TITLE_LENGTH} characters or less."),
        ));
    }
}

fn check_identifier(identifier: &str, path: &str, violations: &mut Vec<Violation>) {
    if identifier.is_empty() {
        violations.push(Violation::new(path, "This value should not be blank."));
    } else if identifier.len() > MAX_IDENTIFIER_LENGTH {
        violations.push(Violation::new(
            path,
            format!(
                "This value is too long. It should have {MAX_IDENTIFIER_LENGTH} characters or less."
            ),
        ));
    } else if !IDENTIFIER_PATTERN.is_match(identifier) {
        violations.push(Violation::new(
            path,
            "Only lowercase letters, digits and underscores are allowed.",
        ));
    }
}

fn check_unique_identifier(
    identifier: &str,
    parent: &str,
    seen: &mut HashSet<String>,
    violations: &mut Vec<Violation>,
) {
    let path = format!("{parent}.identifier");
    check_identifier(identifier, &path, violations);
    if !seen.insert(identifier.to_string()) {
        violations.push(Violation::new(path, "This identifier is used more than once."));
    }
}

fn check_domain_roles(roles: &[String], violations: &mut Vec<Violation>) {
    if roles.is_empty() {
        violations.push(Violation::new("roles", "A domain needs at least one role."));
    }
    let mut seen = HashSet::new();
    for (i, role) in roles.iter().enumerate() {
        let path = format!("roles[{i}]");
        if !ROLE_PATTERN.is_match(role) {
            violations.push(Violation::new(
                &path,
                "Roles must start with ROLE_ followed by uppercase letters, digits or underscores.",
            ));
        }
        if !seen.insert(role.as_str()) {
            violations.push(Violation::new(path, "This role is listed more than once."));
        }
    }
}

fn check_fields(fields: &[FieldDef], parent: &str, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for (i, field) in fields.iter().enumerate() {
        let path = format!("{parent}.fields[{i}]");
        check_unique_identifier(&field.identifier, &path, &mut seen, violations);
        if field.field_type.trim().is_empty() {
            violations.push(Violation::new(
                format!("{path}.type"),
                "This value should not be blank.",
            ));
        }
    }
}

fn check_views(views: &[ViewDef], parent: &str, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for (i, view) in views.iter().enumerate() {
        let path = format!("{parent}.views[{i}]");
        check_unique_identifier(&view.identifier, &path, &mut seen, violations);
        if view.view_type.trim().is_empty() {
            violations.push(Violation::new(
                format!("{path}.type"),
                "This value should not be blank.",
            ));
        }
        if view.table_config().is_some() {
            check_table_settings(&view.settings, &format!("{path}.settings"), violations);
        }
    }
}

fn check_table_settings(settings: &Map<String, Value>, path: &str, violations: &mut Vec<Violation>) {
    if let Some(limit) = settings.get("limit")
        && !limit.is_null()
        && limit.as_u64().is_none()
    {
        violations.push(Violation::new(
            format!("{path}.limit"),
            "Limit must be a positive integer.",
        ));
    }

    match settings.get("orderBy") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                let entry_path = format!("{path}.orderBy[{i}]");
                if !entry.get("field").is_some_and(Value::is_string) {
                    violations.push(Violation::new(
                        format!("{entry_path}.field"),
                        "This value should not be blank.",
                    ));
                }
                let order = entry.get("order").and_then(Value::as_str);
                if !matches!(order, Some("ASC" | "DESC")) {
                    violations.push(Violation::new(
                        format!("{entry_path}.order"),
                        "Order must be ASC or DESC.",
                    ));
                }
            }
        }
        Some(_) => violations.push(Violation::new(
            format!("{path}.orderBy"),
            "orderBy must be a list.",
        )),
    }
}

fn check_permissions(
    permissions: &BTreeMap<String, String>,
    allowed: &[&str],
    path: &str,
    violations: &mut Vec<Violation>,
) {
    for action in permissions.keys() {
        if !allowed.contains(&action.as_str()) {
            violations.push(Violation::new(
                format!("{path}.{action}"),
                format!("Unknown permission. Allowed: {}.", allowed.join(", ")),
            ));
        }
    }
}

/// Roles granted to a member or invitee must exist on the domain.
pub fn validate_member_roles(domain: &DomainEntity, roles: &[String]) -> Vec<Violation> {
    roles
        .iter()
        .enumerate()
        .filter(|(_, role)| !domain.has_role(role))
        .map(|(i, role)| {
            Violation::new(
                format!("roles[{i}]"),
                format!("{role} is not a role of this domain."),
            )
        })
        .collect()
}

/// Member data may only set fields of the member type.
pub fn validate_member_data(member_type: &DomainMemberType, data: &Map<String, Value>) -> Vec<Violation> {
    data.keys()
        .filter(|key| member_type.field(key).is_none())
        .map(|key| {
            Violation::new(
                format!("data.{key}"),
                "This field was not expected.",
            )
        })
        .collect()
}

pub fn validate_email(email: &str) -> Vec<Violation> {
    if email.trim().is_empty() {
        vec![Violation::new("email", "This value should not be blank.")]
    } else if !EMAIL_PATTERN.is_match(email) {
        vec![Violation::new("email", "This value is not a valid email address.")]
    } else {
        Vec::new()
    }
}
