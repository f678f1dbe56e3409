//! Minimart CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run one service's database migrations
//! minimart-cli migrate user
//! minimart-cli migrate product
//! minimart-cli migrate order
//!
//! # Run all database migrations
//! minimart-cli migrate all
//!
//! # Insert demo products (idempotent)
//! minimart-cli seed products
//! ```
//!
//! Database URLs come from the same environment variables the services use
//! (`USER_SERVICE_DATABASE_URL` etc.), with the same defaults.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "minimart-cli")]
#[command(author, version, about = "Minimart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Seed demo data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run user directory migrations
    User,
    /// Run product catalog migrations
    Product,
    /// Run order ledger migrations
    Order,
    /// Run all migrations
    All,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert a handful of demo products (skips existing slugs)
    Products,
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate { target } => match target {
            MigrateTarget::User => commands::migrate::user().await?,
            MigrateTarget::Product => commands::migrate::product().await?,
            MigrateTarget::Order => commands::migrate::order().await?,
            MigrateTarget::All => {
                commands::migrate::user().await?;
                commands::migrate::product().await?;
                commands::migrate::order().await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products => commands::seed::products().await?,
        },
    }
    Ok(())
}
