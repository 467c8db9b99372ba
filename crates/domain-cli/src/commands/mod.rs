//! Command implementations for domain-cli

pub mod domain;
pub mod init;
pub mod member;
pub mod org;

pub use domain::{run_check, run_create, run_delete, run_import, run_list, run_show, run_update};
pub use init::run_init;
pub use member::run_member;
pub use org::run_org;

use std::io::Read;
use std::path::Path;

use colored::Colorize;
use domain_core::{FieldError, Workspace};
use uuid::Uuid;

use crate::error::{CliError, Result};

/// Open the workspace at `root`, or the one containing `cwd`.
pub fn open_workspace(root: Option<&Path>, cwd: &Path) -> Result<Workspace> {
    let workspace = match root {
        Some(root) => Workspace::open(root)?,
        None => Workspace::discover(cwd)?,
    };
    tracing::debug!(root = %workspace.root(), "Using workspace");
    Ok(workspace)
}

/// Read a file, or stdin for `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| CliError::user(format!("Cannot read {}: {}", path.display(), e)))
    }
}

pub fn parse_id(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| CliError::user(format!("Invalid {what} id: {value}")))
}

/// Print field errors and turn them into the command's failure.
pub fn rejection(errors: &[FieldError]) -> CliError {
    eprintln!("{}", "Validation failed:".red().bold());
    for error in errors {
        eprintln!("  {} {}", "!".red(), error.message);
    }
    CliError::user(format!("{} validation error(s), nothing was saved", errors.len()))
}
