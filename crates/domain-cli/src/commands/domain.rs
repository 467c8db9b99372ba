//! Domain commands: list, check, show, create, import, update, delete

use std::path::Path;

use colored::Colorize;
use serde_json::{Value, json};

use domain_content::unified_diff;
use domain_core::{
    CheckStatus, DomainRules, DomainService, DriftItem, EditSession, FileStore, Outcome,
    PendingEdit, Preview, Step, Workspace,
};
use domain_fs::FsConfigSource;
use domain_meta::{ConfigCodec, DomainEntity};

use super::{open_workspace, read_input, rejection};
use crate::error::{CliError, Result};

type Service = DomainService<FileStore, FsConfigSource, DomainRules>;

fn open_service(root: Option<&Path>, cwd: &Path) -> Result<Service> {
    let workspace: Workspace = open_workspace(root, cwd)?;
    Ok(DomainService::new(
        workspace.open_store()?,
        workspace.config_source(),
        DomainRules,
    ))
}

/// JSON form of a domain: its configuration plus stored identity.
fn domain_json(domain: &DomainEntity) -> Value {
    let mut value = ConfigCodec::new().to_value(domain);
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), json!(domain.id));
        map.insert("organization".to_string(), json!(domain.organization));
    }
    value
}

pub fn run_list(root: Option<&Path>, cwd: &Path, organization: &str, json: bool) -> Result<()> {
    let service = open_service(root, cwd)?;
    let index = service.index(organization)?;

    if json {
        let output = json!({
            "domains": index.domains.iter().map(domain_json).collect::<Vec<_>>(),
            "missing": index.missing,
            "warnings": index.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for warning in &index.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    if index.domains.is_empty() {
        println!("No domains in {}.", organization.cyan());
    } else {
        println!("{}", "Domains:".bold());
        for domain in &index.domains {
            println!(
                "   {} {} ({})",
                "*".green(),
                domain.title,
                domain.identifier.cyan()
            );
        }
    }

    if !index.missing.is_empty() {
        println!();
        println!("{}", "Configuration files without a domain:".bold());
        for identifier in &index.missing {
            println!("   {} {}", "-".yellow(), identifier.cyan());
        }
        println!();
        println!(
            "Run {} to create one.",
            format!("domains import {organization} <domain>").cyan()
        );
    }
    Ok(())
}

fn print_items(items: &[DriftItem], bullet: colored::ColoredString) {
    for item in items {
        println!("   {} {}: {}", bullet, item.domain.cyan(), item.description);
        for change in &item.changes {
            println!("       {}", change.dimmed());
        }
    }
}

pub fn run_check(root: Option<&Path>, cwd: &Path, organization: &str, json: bool) -> Result<()> {
    let service = open_service(root, cwd)?;
    let report = service.check(organization)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match report.status {
        CheckStatus::Healthy => {
            println!(
                "{} All domains match their configuration files.",
                "OK".green().bold()
            );
        }
        CheckStatus::Missing => {
            println!("{} Some configuration files are missing:", "MISSING".yellow().bold());
            print_items(&report.missing, "-".yellow());
        }
        CheckStatus::Drifted => {
            println!("{} Configuration has drifted:", "DRIFTED".red().bold());
            print_items(&report.drifted, "!".red());
            if !report.missing.is_empty() {
                println!();
                println!("{} Also missing:", "MISSING".yellow().bold());
                print_items(&report.missing, "-".yellow());
            }
        }
        CheckStatus::Broken => {
            println!("{} Some configuration files cannot be read:", "BROKEN".red().bold());
            print_items(&report.broken, "!".red());
        }
    }

    if !report.is_healthy() {
        println!();
        println!(
            "Run {} to review and reconcile a domain.",
            format!("domains update {organization} <domain>").cyan()
        );
    }
    if !report.unimported.is_empty() {
        println!();
        println!("{}", "Not imported:".bold());
        for identifier in &report.unimported {
            println!("   {} {}", "-".yellow(), identifier.cyan());
        }
    }
    for message in &report.messages {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }
    Ok(())
}

pub fn run_show(
    root: Option<&Path>,
    cwd: &Path,
    organization: &str,
    identifier: &str,
    json: bool,
) -> Result<()> {
    let service = open_service(root, cwd)?;
    let domain = service.view(organization, identifier)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&domain_json(domain))?);
        return Ok(());
    }

    println!("{} ({})", domain.title.bold(), domain.key().to_string().cyan());
    println!("  id:    {}", domain.id);
    println!("  roles: {}", domain.roles.join(", "));

    if !domain.content_types.is_empty() {
        println!();
        println!("{}", "Content types:".bold());
        for content_type in &domain.content_types {
            let fields: Vec<&str> = content_type
                .fields
                .iter()
                .map(|f| f.identifier.as_str())
                .collect();
            println!(
                "   {} {} ({}): {}",
                "*".green(),
                content_type.title,
                content_type.identifier.cyan(),
                fields.join(", ")
            );
            for view in &content_type.views {
                let Some(table) = view.table_config() else {
                    continue;
                };
                let order: Vec<String> = table
                    .order_by
                    .iter()
                    .map(|o| format!("{} {}", o.field, o.order))
                    .collect();
                println!(
                    "       view {}: {} per page, order by {}",
                    view.identifier,
                    table.limit,
                    order.join(", ")
                );
            }
        }
    }
    if !domain.setting_types.is_empty() {
        println!();
        println!("{}", "Setting types:".bold());
        for setting_type in &domain.setting_types {
            println!(
                "   {} {} ({})",
                "*".green(),
                setting_type.title,
                setting_type.identifier.cyan()
            );
        }
    }
    println!();
    println!("{}", "Member types:".bold());
    for member_type in &domain.domain_member_types {
        println!(
            "   {} {} ({})",
            "*".green(),
            member_type.title,
            member_type.identifier.cyan()
        );
    }
    Ok(())
}

fn report_created(outcome: Outcome<DomainEntity>) -> Result<()> {
    match outcome {
        Outcome::Done(domain) => {
            println!(
                "{} Created domain {} ({})",
                "OK".green().bold(),
                domain.title.cyan(),
                domain.key()
            );
            Ok(())
        }
        Outcome::Rejected(errors) => Err(rejection(&errors)),
    }
}

pub fn run_create(
    root: Option<&Path>,
    cwd: &Path,
    organization: &str,
    file: Option<&Path>,
    seed: bool,
) -> Result<()> {
    let mut service = open_service(root, cwd)?;
    if seed {
        println!("{}", service.create_seed());
        return Ok(());
    }
    let file = file.ok_or_else(|| CliError::user("Either --file or --seed is required"))?;
    let text = read_input(file)?;
    report_created(service.create(organization, &text)?)
}

pub fn run_import(root: Option<&Path>, cwd: &Path, organization: &str, identifier: &str) -> Result<()> {
    let mut service = open_service(root, cwd)?;
    let text = service.import_seed(organization, identifier)?;
    report_created(service.create(organization, &text)?)
}

fn print_warnings(session: &EditSession) {
    for warning in session.warnings() {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}

fn print_preview(preview: &Preview) {
    let codec = ConfigCodec::new();
    let diff = unified_diff(
        &codec.serialize_pretty(&preview.original),
        &codec.serialize_pretty(&preview.updated),
        "stored",
        "edited",
    );

    if preview.changes.is_equivalent {
        println!("{} No changes to the stored domain.", "=".dimmed());
        return;
    }

    println!("{}", "Changes:".bold());
    for change in &preview.changes.changes {
        println!("   {}", change.to_string().yellow());
    }
    println!();
    for line in diff.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            println!("{}", line.green());
        } else if line.starts_with('-') && !line.starts_with("---") {
            println!("{}", line.red());
        } else {
            println!("{line}");
        }
    }
}

/// Without a file, print the configuration to edit. With one, validate and
/// preview it; `confirm` saves the preview and `back` discards it.
pub fn run_update(
    root: Option<&Path>,
    cwd: &Path,
    organization: &str,
    identifier: &str,
    file: Option<&Path>,
    confirm: bool,
    back: bool,
) -> Result<()> {
    let mut service = open_service(root, cwd)?;
    let mut session = service.begin_update(organization, identifier)?;
    print_warnings(&session);

    let Some(file) = file else {
        println!("{}", session.seed());
        return Ok(());
    };
    let text = read_input(file)?;

    let preview = match service.apply_update(&mut session, &PendingEdit::submit(text))? {
        Step::Preview(preview) => preview,
        Step::Rejected(errors) => return Err(rejection(&errors)),
        step => {
            return Err(CliError::user(format!(
                "Unexpected result while {}: {:?}",
                session.state(),
                step
            )));
        }
    };
    print_preview(&preview);

    if back {
        service.apply_update(&mut session, &PendingEdit::back())?;
        println!();
        println!("{} Preview discarded.", "=>".blue().bold());
        println!("{}", session.seed());
        return Ok(());
    }
    if !confirm {
        println!();
        println!("Run again with {} to save these changes.", "--confirm".cyan());
        return Ok(());
    }

    match service.apply_update(&mut session, &PendingEdit::confirm())? {
        Step::Committed(domain) => {
            println!(
                "{} Saved domain {} ({})",
                "OK".green().bold(),
                domain.title.cyan(),
                domain.key()
            );
            Ok(())
        }
        Step::Rejected(errors) => Err(rejection(&errors)),
        step => Err(CliError::user(format!(
            "Unexpected result while {}: {:?}",
            session.state(),
            step
        ))),
    }
}

pub fn run_delete(root: Option<&Path>, cwd: &Path, organization: &str, identifier: &str) -> Result<()> {
    let mut service = open_service(root, cwd)?;
    match service.delete(organization, identifier)? {
        Outcome::Done(domain) => {
            println!(
                "{} Deleted domain {} ({})",
                "OK".green().bold(),
                domain.title.cyan(),
                domain.key()
            );
            println!("  Its configuration file was kept.");
            Ok(())
        }
        Outcome::Rejected(errors) => Err(rejection(&errors)),
    }
}
