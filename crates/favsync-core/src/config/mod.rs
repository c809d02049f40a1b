//! Remote repository configuration.
//!
//! `RepoConfig` names the GitHub repository and data branch that hold the
//! per-user favorites documents. It is passed explicitly into the remote
//! client; nothing here reads process-wide state unless `from_env` is called.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_DATA_BRANCH: &str = "data";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const ENV_REPO_OWNER: &str = "FAVSYNC_REPO_OWNER";
pub const ENV_REPO_NAME: &str = "FAVSYNC_REPO_NAME";
pub const ENV_DATA_BRANCH: &str = "FAVSYNC_DATA_BRANCH";
pub const ENV_API_BASE_URL: &str = "FAVSYNC_API_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Location of the favorites documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// REST API base, without trailing slash
    pub api_base_url: String,
    pub repo_owner: String,
    pub repo_name: String,
    /// Branch that receives favorites commits
    pub data_branch: String,
    pub request_timeout: Duration,
}

impl RepoConfig {
    /// Build a config for `owner/name` with default branch, API URL and timeout.
    pub fn new(repo_owner: impl AsRef<str>, repo_name: impl AsRef<str>) -> Result<Self, ConfigError> {
        let repo_owner = normalize_text_option(Some(repo_owner.as_ref().to_string()))
            .ok_or_else(|| ConfigError::Invalid("repo_owner must not be empty".to_string()))?;
        let repo_name = normalize_text_option(Some(repo_name.as_ref().to_string()))
            .ok_or_else(|| ConfigError::Invalid("repo_name must not be empty".to_string()))?;

        Ok(Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            repo_owner,
            repo_name,
            data_branch: DEFAULT_DATA_BRANCH.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }

    /// Use a different data branch. Blank values keep the current branch.
    #[must_use]
    pub fn with_data_branch(mut self, branch: impl AsRef<str>) -> Self {
        if let Some(branch) = normalize_text_option(Some(branch.as_ref().to_string())) {
            self.data_branch = branch;
        }
        self
    }

    /// Point the client at another API host (GitHub Enterprise, test servers).
    pub fn with_api_base_url(mut self, url: impl AsRef<str>) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_api_base_url(url.as_ref())?;
        Ok(self)
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from `FAVSYNC_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let repo_owner = required_trimmed(&lookup, ENV_REPO_OWNER)?;
        let repo_name = required_trimmed(&lookup, ENV_REPO_NAME)?;

        let mut config = Self::new(repo_owner, repo_name)?;
        if let Some(branch) = optional_trimmed(&lookup, ENV_DATA_BRANCH) {
            config = config.with_data_branch(branch);
        }
        if let Some(url) = optional_trimmed(&lookup, ENV_API_BASE_URL) {
            config = config.with_api_base_url(url)?;
        }
        Ok(config)
    }

    /// Repository path of a user's favorites document.
    pub fn favorites_path(login: &str) -> String {
        format!("favorites/{login}.json")
    }
}

fn normalize_api_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = normalize_text_option(Some(raw.to_string()))
        .ok_or_else(|| ConfigError::Invalid("api_base_url must not be empty".to_string()))?;
    if !is_http_url(&url) {
        return Err(ConfigError::Invalid(
            "api_base_url must include http:// or https://".to_string(),
        ));
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn required_trimmed(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional_trimmed(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    normalize_text_option(lookup(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(map: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        |key| map.get(key).map(|value| (*value).to_string())
    }

    #[test]
    fn from_lookup_requires_owner_and_name() {
        let map = HashMap::new();
        let error = RepoConfig::from_lookup(lookup_from(&map)).unwrap_err();
        assert!(error.to_string().contains(ENV_REPO_OWNER));

        let map = HashMap::from([(ENV_REPO_OWNER, "owner")]);
        let error = RepoConfig::from_lookup(lookup_from(&map)).unwrap_err();
        assert!(error.to_string().contains(ENV_REPO_NAME));
    }

    #[test]
    fn from_lookup_applies_defaults() {
        let map = HashMap::from([(ENV_REPO_OWNER, " owner "), (ENV_REPO_NAME, "papers")]);
        let config = RepoConfig::from_lookup(lookup_from(&map)).unwrap();
        assert_eq!(config.repo_owner, "owner");
        assert_eq!(config.repo_name, "papers");
        assert_eq!(config.data_branch, DEFAULT_DATA_BRANCH);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn from_lookup_overrides_branch_and_api_url() {
        let map = HashMap::from([
            (ENV_REPO_OWNER, "owner"),
            (ENV_REPO_NAME, "papers"),
            (ENV_DATA_BRANCH, "favorites-data"),
            (ENV_API_BASE_URL, "https://ghe.example.com/api/v3/"),
        ]);
        let config = RepoConfig::from_lookup(lookup_from(&map)).unwrap();
        assert_eq!(config.data_branch, "favorites-data");
        assert_eq!(config.api_base_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn api_base_url_requires_http_scheme() {
        let config = RepoConfig::new("owner", "papers").unwrap();
        assert!(config.with_api_base_url("ghe.example.com").is_err());
    }

    #[test]
    fn favorites_path_is_derived_from_login() {
        assert_eq!(RepoConfig::favorites_path("octocat"), "favorites/octocat.json");
    }
}
