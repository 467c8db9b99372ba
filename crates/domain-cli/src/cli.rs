//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Domain Manager - Keep domain configurations and their files in sync
#[derive(Parser, Debug)]
#[command(name = "domains")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the nearest directory containing .domains/)
    #[arg(long, global = true, env = "DOMAINS_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize a domain workspace
    ///
    /// Creates .domains/config.toml and the configuration directory.
    Init,

    /// Manage organizations, their users and API keys
    Org {
        #[command(subcommand)]
        action: OrgAction,
    },

    /// List the domains of an organization
    ///
    /// Also lists configuration files that have no domain yet.
    List {
        organization: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Compare every domain with its configuration file
    Check {
        organization: String,

        /// Output as JSON for CI/CD integration
        #[arg(long)]
        json: bool,
    },

    /// Show a domain with its content and setting types
    Show {
        organization: String,
        domain: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Create a domain from a configuration
    ///
    /// Examples:
    ///   domains create acme --seed > blog.json   # Start from a template
    ///   domains create acme --file blog.json
    Create {
        organization: String,

        /// Configuration file to create the domain from ("-" for stdin)
        #[arg(short, long, required_unless_present = "seed")]
        file: Option<PathBuf>,

        /// Print the starting configuration instead of creating
        #[arg(long, conflicts_with = "file")]
        seed: bool,
    },

    /// Create a domain from its existing configuration file
    Import {
        organization: String,
        domain: String,
    },

    /// Update a domain
    ///
    /// Without --file, prints the configuration to edit along with drift
    /// warnings. With --file, validates the edit and previews the changes;
    /// add --confirm to save them.
    ///
    /// Examples:
    ///   domains update acme blog > blog.json
    ///   domains update acme blog --file blog.json
    ///   domains update acme blog --file blog.json --confirm
    Update {
        organization: String,
        domain: String,

        /// Edited configuration ("-" for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save the previewed changes
        #[arg(long, requires = "file", conflicts_with = "back")]
        confirm: bool,

        /// Discard the preview and show the configuration again
        #[arg(long, requires = "file")]
        back: bool,
    },

    /// Delete a domain (its configuration file is kept)
    Delete {
        organization: String,
        domain: String,
    },

    /// Manage domain members and invitations
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   domains completions bash > ~/.local/share/bash-completion/completions/domains
    ///   domains completions zsh > ~/.zfunc/_domains
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Organization actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OrgAction {
    /// Add an organization
    Add { identifier: String, title: String },

    /// Add a user to an organization
    AddUser {
        organization: String,
        email: String,

        /// Display name
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Add an API key to an organization
    AddKey { organization: String, name: String },
}

/// Member actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MemberAction {
    /// List members and pending invitations of a member type
    List {
        organization: String,
        domain: String,
        member_type: String,

        #[arg(long)]
        json: bool,
    },

    /// List users and API keys that can be added
    Candidates {
        organization: String,
        domain: String,
        member_type: String,

        #[arg(long)]
        json: bool,
    },

    /// Add a user or API key as member
    Add {
        organization: String,
        domain: String,
        member_type: String,

        /// Id of the user or API key (see `member candidates`)
        accessor: String,

        /// Domain role to grant (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },

    /// Invite someone by email
    Invite {
        organization: String,
        domain: String,
        member_type: String,
        email: String,

        /// Domain role to grant (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,
    },

    /// Change a member's roles or data
    Update {
        organization: String,
        domain: String,
        member_type: String,
        member: String,

        /// Domain role to grant (repeatable; replaces current roles)
        #[arg(short, long = "role")]
        roles: Vec<String>,

        /// Member data as a JSON object (replaces current data)
        #[arg(long)]
        data: Option<String>,
    },

    /// Remove a member
    Remove {
        organization: String,
        domain: String,
        member_type: String,
        member: String,
    },

    /// Delete a pending invitation
    DeleteInvite {
        organization: String,
        domain: String,
        member_type: String,
        invitation: String,
    },
}
