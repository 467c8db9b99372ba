//! Member and invitation commands

use std::path::Path;

use colored::Colorize;
use serde_json::{Map, Value, json};

use domain_core::{MembershipService, Outcome};

use super::{open_workspace, parse_id, rejection};
use crate::cli::MemberAction;
use crate::error::{CliError, Result};

fn parse_data(data: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(data)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::user("Member data must be a JSON object")),
    }
}

pub fn run_member(root: Option<&Path>, cwd: &Path, action: MemberAction) -> Result<()> {
    let workspace = open_workspace(root, cwd)?;
    let mut service = MembershipService::new(
        workspace.open_store()?,
        workspace.notifier(),
        workspace.manifest().mail.base_url.clone(),
    );

    match action {
        MemberAction::List {
            organization,
            domain,
            member_type,
            json,
        } => {
            let listing = service.list(&organization, &domain, &member_type)?;
            if json {
                let output = json!({
                    "member_type": listing.member_type.identifier,
                    "members": listing.members,
                    "invitations": listing.invitations.iter().map(|i| json!({
                        "id": i.id,
                        "email": i.email,
                        "roles": i.roles,
                        "requested_at": i.requested_at,
                    })).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            println!("{}", listing.member_type.title.bold());
            if listing.members.is_empty() {
                println!("   No members.");
            }
            for member in &listing.members {
                println!(
                    "   {} {} [{}] {}",
                    "*".green(),
                    member.accessor.label,
                    member.roles.join(", "),
                    member.id.to_string().dimmed()
                );
            }
            if !listing.invitations.is_empty() {
                println!();
                println!("{}", "Pending invitations:".bold());
                for invitation in &listing.invitations {
                    println!(
                        "   {} {} [{}] {}",
                        "-".yellow(),
                        invitation.email,
                        invitation.roles.join(", "),
                        invitation.id.to_string().dimmed()
                    );
                }
            }
        }
        MemberAction::Candidates {
            organization,
            domain,
            member_type,
            json,
        } => {
            let candidates = service.candidates(&organization, &domain, &member_type)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
                return Ok(());
            }
            if candidates.is_empty() {
                println!("No users or API keys left to add.");
            }
            for candidate in &candidates {
                println!("   {} {}", candidate.id.to_string().dimmed(), candidate.label);
            }
        }
        MemberAction::Add {
            organization,
            domain,
            member_type,
            accessor,
            roles,
        } => {
            let accessor = parse_id(&accessor, "accessor")?;
            match service.add_member(&organization, &domain, &member_type, accessor, roles)? {
                Outcome::Done(member) => {
                    println!(
                        "{} Added {} as {}",
                        "OK".green().bold(),
                        member.accessor.label.cyan(),
                        member_type
                    );
                    println!("  id: {}", member.id);
                }
                Outcome::Rejected(errors) => return Err(rejection(&errors)),
            }
        }
        MemberAction::Invite {
            organization,
            domain,
            member_type,
            email,
            roles,
        } => match service.invite(&organization, &domain, &member_type, &email, roles)? {
            Outcome::Done(invitation) => {
                println!(
                    "{} Invited {} as {}",
                    "OK".green().bold(),
                    invitation.email.cyan(),
                    member_type
                );
                println!("  id: {}", invitation.id);
            }
            Outcome::Rejected(errors) => return Err(rejection(&errors)),
        },
        MemberAction::Update {
            organization,
            domain,
            member_type,
            member,
            roles,
            data,
        } => {
            let member_id = parse_id(&member, "member")?;
            let roles = (!roles.is_empty()).then_some(roles);
            let data = data.as_deref().map(parse_data).transpose()?;
            if roles.is_none() && data.is_none() {
                return Err(CliError::user("Nothing to update; pass --role or --data"));
            }
            match service.update_member(&organization, &domain, &member_type, member_id, roles, data)? {
                Outcome::Done(member) => println!(
                    "{} Updated {}",
                    "OK".green().bold(),
                    member.accessor.label.cyan()
                ),
                Outcome::Rejected(errors) => return Err(rejection(&errors)),
            }
        }
        MemberAction::Remove {
            organization,
            domain,
            member_type,
            member,
        } => {
            let member_id = parse_id(&member, "member")?;
            let member = service.remove_member(&organization, &domain, &member_type, member_id)?;
            println!("{} Removed {}", "OK".green().bold(), member.accessor.label.cyan());
        }
        MemberAction::DeleteInvite {
            organization,
            domain,
            member_type,
            invitation,
        } => {
            let invitation_id = parse_id(&invitation, "invitation")?;
            let invitation =
                service.delete_invite(&organization, &domain, &member_type, invitation_id)?;
            println!(
                "{} Deleted invitation for {}",
                "OK".green().bold(),
                invitation.email.cyan()
            );
        }
    }
    Ok(())
}
