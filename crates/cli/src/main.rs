//! `QResto` CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema and session table)
//! qresto-cli migrate
//!
//! # Create a super admin
//! qresto-cli admin create -e admin@qresto.app -p 'a-long-password'
//!
//! # Load the "el-faro" demo restaurant
//! qresto-cli seed demo
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qresto-cli")]
#[command(author, version, about = "QResto CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage super admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Load sample data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a super admin account
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Login password (at least 8 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create the "el-faro" demo restaurant and its owner
    Demo,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => {
                commands::admin::create_super_admin(&email, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Demo => commands::seed::demo().await?,
        },
    }
    Ok(())
}
