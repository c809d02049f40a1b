use std::env;
use std::path::Path;

use favsync_core::remote::RemoteContentStore;
use favsync_core::store::KeyValueStore;
use favsync_core::SyncOrchestrator;

use crate::cli::AuthCommands;
use crate::commands::common::{open_orchestrator, open_store, ENV_GITHUB_TOKEN};
use crate::config_profiles::normalize_text_option;
use crate::error::CliError;

pub async fn run_auth(
    command: AuthCommands,
    db_path: &Path,
    profile: Option<&str>,
) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { token } => {
            let token = resolve_token(token, env::var(ENV_GITHUB_TOKEN).ok())?;
            let orchestrator = open_orchestrator(db_path, profile).await?;
            let credentials = orchestrator.connect(&token).await?;
            println!("Signed in as {}", credentials.login);
            Ok(())
        }
        AuthCommands::Status => {
            let store = open_store(db_path).await?;
            match store.credentials().await {
                Some(credentials) => println!("Signed in as {}", credentials.login),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        AuthCommands::Logout => match open_orchestrator(db_path, profile).await {
            Ok(orchestrator) => sign_out(&orchestrator).await,
            Err(CliError::Config(reason)) => {
                tracing::debug!("Signing out without a repository profile: {}", reason);
                open_store(db_path).await?.clear_credentials().await?;
                println!("Signed out. Local favorites were kept.");
                Ok(())
            }
            Err(error) => Err(error),
        },
    }
}

pub async fn sign_out<K, R>(orchestrator: &SyncOrchestrator<K, R>) -> Result<(), CliError>
where
    K: KeyValueStore,
    R: RemoteContentStore,
{
    orchestrator.disconnect().await?;
    println!("Signed out. Local favorites were kept.");
    Ok(())
}

/// The flag wins over the environment; blank values count as absent.
pub fn resolve_token(explicit: Option<String>, from_env: Option<String>) -> Result<String, CliError> {
    normalize_text_option(explicit)
        .or_else(|| normalize_text_option(from_env))
        .ok_or_else(|| {
            CliError::Auth(format!(
                "No token provided. Pass --token or set {ENV_GITHUB_TOKEN}."
            ))
        })
}
