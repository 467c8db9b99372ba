//! Organization commands

use std::path::Path;

use colored::Colorize;
use domain_core::{MembershipService, Outcome};

use super::{open_workspace, rejection};
use crate::cli::OrgAction;
use crate::error::Result;

pub fn run_org(root: Option<&Path>, cwd: &Path, action: OrgAction) -> Result<()> {
    let workspace = open_workspace(root, cwd)?;
    let mut service = MembershipService::new(
        workspace.open_store()?,
        workspace.notifier(),
        workspace.manifest().mail.base_url.clone(),
    );

    match action {
        OrgAction::Add { identifier, title } => {
            match service.add_organization(&identifier, &title)? {
                Outcome::Done(org) => println!(
                    "{} Added organization {} ({})",
                    "OK".green().bold(),
                    org.title.cyan(),
                    org.identifier
                ),
                Outcome::Rejected(errors) => return Err(rejection(&errors)),
            }
        }
        OrgAction::AddUser {
            organization,
            email,
            name,
        } => match service.add_user(&organization, &email, &name)? {
            Outcome::Done(user) => {
                println!("{} Added user {}", "OK".green().bold(), user.email.cyan());
                println!("  id: {}", user.id);
            }
            Outcome::Rejected(errors) => return Err(rejection(&errors)),
        },
        OrgAction::AddKey { organization, name } => {
            match service.add_api_key(&organization, &name)? {
                Outcome::Done(key) => {
                    println!("{} Added API key {}", "OK".green().bold(), key.name.cyan());
                    println!("  id: {}", key.id);
                }
                Outcome::Rejected(errors) => return Err(rejection(&errors)),
            }
        }
    }
    Ok(())
}
