//! favsync - keep favorite papers in sync with a GitHub repository
//!
//! Favorites live in a local database; `favsync sync` pushes them to one JSON
//! document per user in the configured repository.

mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::resolve_db_path;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::list::run_list;
use crate::commands::pull::run_pull;
use crate::commands::remote::run_remote;
use crate::commands::remove::run_remove;
use crate::commands::status::run_status;
use crate::commands::sync::run_sync;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("favsync=info,favsync_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path);
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Add { ids } => run_add(&ids, &db_path).await?,
        Commands::Remove { ids } => run_remove(&ids, &db_path).await?,
        Commands::List { json } => run_list(json, &db_path).await?,
        Commands::Sync { metadata } => run_sync(metadata.as_deref(), &db_path, profile).await?,
        Commands::Status { json } => run_status(json, &db_path).await?,
        Commands::Remote { json } => run_remote(json, &db_path, profile).await?,
        Commands::Pull => run_pull(&db_path, profile).await?,
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Auth { command } => run_auth(command, &db_path, profile).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
