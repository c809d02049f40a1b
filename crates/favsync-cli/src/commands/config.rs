use std::env;

use favsync_core::config::{ENV_API_BASE_URL, ENV_DATA_BRANCH, ENV_REPO_NAME, ENV_REPO_OWNER};

use crate::cli::ConfigCommands;
use crate::config_profiles::{is_http_url, normalize_text_option, CliProfile, CliProfilesConfig};
use crate::error::CliError;

/// Explicit values passed to `config init`.
#[derive(Debug, Default)]
pub struct ProfileInput {
    pub repo_owner: Option<String>,
    pub repo_name: Option<String>,
    pub data_branch: Option<String>,
    pub api_base_url: Option<String>,
}

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            repo_owner,
            repo_name,
            data_branch,
            api_base_url,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            ProfileInput {
                repo_owner,
                repo_name,
                data_branch,
                api_base_url,
            },
            no_activate,
        ),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    input: ProfileInput,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    apply_profile_input(profile, input, |name| env::var(name).ok());
    validate_profile(profile)?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save()?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let missing_fields = config
        .profile(&profile_name)
        .map(CliProfile::missing_fields)
        .unwrap_or_default();
    if missing_fields.is_empty() {
        println!(
            "Profile '{profile_name}' is ready. Run `favsync auth login --token <token>` to enable sync."
        );
    } else {
        println!(
            "Profile '{}' is missing: {}",
            profile_name,
            missing_fields.join(", ")
        );
    }

    Ok(())
}

/// Explicit values first, then `FAVSYNC_*` variables, then what is stored.
pub fn apply_profile_input(
    profile: &mut CliProfile,
    input: ProfileInput,
    env_lookup: impl Fn(&str) -> Option<String>,
) {
    let merge = |explicit: Option<String>, env_name: &str, existing: Option<String>| {
        normalize_text_option(explicit)
            .or_else(|| normalize_text_option(env_lookup(env_name)))
            .or_else(|| normalize_text_option(existing))
    };

    profile.repo_owner = merge(input.repo_owner, ENV_REPO_OWNER, profile.repo_owner.take());
    profile.repo_name = merge(input.repo_name, ENV_REPO_NAME, profile.repo_name.take());
    profile.data_branch = merge(input.data_branch, ENV_DATA_BRANCH, profile.data_branch.take());
    profile.api_base_url = merge(
        input.api_base_url,
        ENV_API_BASE_URL,
        profile.api_base_url.take(),
    )
    .map(|url| url.trim_end_matches('/').to_string());
}

pub fn validate_profile(profile: &CliProfile) -> Result<(), CliError> {
    if let Some(url) = normalize_text_option(profile.api_base_url.clone()) {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "api_base_url must include http:// or https://".to_string(),
            ));
        }
    }
    Ok(())
}
