//! DashDesk CLI - fixture checks and marketplace API probes.
//!
//! # Usage
//!
//! ```bash
//! # Check the bundled mock dataset
//! dd-cli fixtures check
//!
//! # Check an edited copy before swapping it in
//! dd-cli fixtures check --file crates/admin/fixtures/mock_data.yaml
//!
//! # Sign in to the remote API and print totals per entity
//! dd-cli api stats
//!
//! # Does the support preset cover both sections?
//! dd-cli roles check support manage_orders manage_support
//! ```
//!
//! # Commands
//!
//! - `fixtures check` - Validate a mock dataset
//! - `api stats` - Record totals from the marketplace API
//! - `roles check` - Permissions granted by a role preset

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dd-cli")]
#[command(author, version, about = "DashDesk admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Work with mock datasets
    Fixtures {
        #[command(subcommand)]
        action: FixturesAction,
    },
    /// Probe the marketplace API
    Api {
        #[command(subcommand)]
        action: ApiAction,
    },
    /// Inspect role permission presets
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },
}

#[derive(Subcommand)]
enum FixturesAction {
    /// Parse a dataset and report every consistency problem
    Check {
        /// YAML file to check (defaults to the dataset bundled in the admin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ApiAction {
    /// Sign in and print record totals per entity
    Stats,
}

#[derive(Subcommand)]
enum RolesAction {
    /// Check which permissions a role preset grants
    Check {
        /// Role name (super_admin, admin, support)
        role: String,
        /// Permission flag names; lists the whole preset when omitted
        permissions: Vec<String>,
        /// Pass when any one of the permissions is granted
        #[arg(long)]
        any: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Fixtures { action } => match action {
            FixturesAction::Check { file } => commands::fixtures::check(file.as_deref())?,
        },
        Commands::Api { action } => match action {
            ApiAction::Stats => commands::api::stats().await?,
        },
        Commands::Roles { action } => match action {
            RolesAction::Check {
                role,
                permissions,
                any,
            } => commands::roles::check(&role, &permissions, any)?,
        },
    }
    Ok(())
}
