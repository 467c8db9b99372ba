//! Init command implementation

use std::path::Path;

use colored::Colorize;
use domain_core::Workspace;

use crate::error::Result;

/// Create the workspace layout under `root`.
pub fn run_init(root: &Path) -> Result<()> {
    let workspace = Workspace::init(root)?;

    println!(
        "{} Initialized domain workspace in {}",
        "OK".green().bold(),
        workspace.root().as_str().yellow()
    );
    println!("  configs: {}", workspace.config_dir().as_str().cyan());
    println!("  store:   {}", workspace.store_path().as_str().cyan());
    Ok(())
}
