//! Domain Manager CLI
//!
//! Administers domains, their configuration files and their members from
//! the command line.

mod cli;
mod commands;
mod error;

use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    match cli.command {
        Some(cmd) => execute_command(cmd, cli.root.as_deref(), &cwd),
        None => {
            println!("{} Domain Manager CLI", "domains".green().bold());
            println!();
            println!("Run {} for available commands.", "domains --help".cyan());
            Ok(())
        }
    }
}

/// Logs go to stderr so JSON output stays clean.
fn init_tracing(verbose: bool) {
    if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .try_init();
    }
}

fn execute_command(cmd: Commands, root: Option<&Path>, cwd: &Path) -> Result<()> {
    match cmd {
        Commands::Init => {
            let root: PathBuf = root.map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
            commands::run_init(&root)
        }
        Commands::Org { action } => commands::run_org(root, cwd, action),
        Commands::List { organization, json } => {
            commands::run_list(root, cwd, &organization, json)
        }
        Commands::Check { organization, json } => {
            commands::run_check(root, cwd, &organization, json)
        }
        Commands::Show {
            organization,
            domain,
            json,
        } => commands::run_show(root, cwd, &organization, &domain, json),
        Commands::Create {
            organization,
            file,
            seed,
        } => commands::run_create(root, cwd, &organization, file.as_deref(), seed),
        Commands::Import {
            organization,
            domain,
        } => commands::run_import(root, cwd, &organization, &domain),
        Commands::Update {
            organization,
            domain,
            file,
            confirm,
            back,
        } => commands::run_update(
            root,
            cwd,
            &organization,
            &domain,
            file.as_deref(),
            confirm,
            back,
        ),
        Commands::Delete {
            organization,
            domain,
        } => commands::run_delete(root, cwd, &organization, &domain),
        Commands::Member { action } => commands::run_member(root, cwd, action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "domains", &mut std::io::stdout());
            Ok(())
        }
    }
}
