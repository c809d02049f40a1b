//! Persistent CLI profile configuration.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use favsync_core::config::{ENV_API_BASE_URL, ENV_DATA_BRANCH, ENV_REPO_NAME, ENV_REPO_OWNER};
pub use favsync_core::util::is_http_url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "cli-config.json";
pub const ENV_PROFILE: &str = "FAVSYNC_PROFILE";
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Error)]
pub enum ProfileConfigError {
    #[error("Failed to read config at {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write config at {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, CliProfile>,
}

/// Repository settings for one profile. Every field may be overridden by the
/// matching `FAVSYNC_*` environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfile {
    #[serde(default)]
    pub repo_owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub data_branch: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("favsync")
        .join(CONFIG_FILE_NAME)
}

pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    favsync_core::util::normalize_text_option(value)
}

pub fn normalize_profile_name(value: Option<&str>) -> Option<String> {
    let value = value?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, ProfileConfigError> {
        Self::load_from_path(&default_config_path())
    }

    /// A missing file is an empty configuration.
    pub fn load_from_path(path: &Path) -> Result<Self, ProfileConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ProfileConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = serde_json::from_str::<Self>(&raw).map_err(|source| {
            ProfileConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(config.normalized())
    }

    pub fn save(&self) -> Result<PathBuf, ProfileConfigError> {
        let path = default_config_path();
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ProfileConfigError> {
        let write_error = |source| ProfileConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let serialized = serde_json::to_vec_pretty(&self.clone().normalized())
            .map_err(io::Error::other)
            .map_err(write_error)?;
        fs::write(path, serialized).map_err(write_error)
    }

    /// Explicit flag, then `FAVSYNC_PROFILE`, then the active profile.
    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        self.resolve_profile_name_with_env(
            explicit,
            std::env::var(ENV_PROFILE).ok().as_deref(),
        )
    }

    pub fn resolve_profile_name_with_env(
        &self,
        explicit: Option<&str>,
        env_profile: Option<&str>,
    ) -> String {
        normalize_profile_name(explicit)
            .or_else(|| normalize_profile_name(env_profile))
            .or_else(|| normalize_profile_name(self.active_profile.as_deref()))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    pub fn profile(&self, name: &str) -> Option<&CliProfile> {
        self.profiles.get(name)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut CliProfile {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalized(mut self) -> Self {
        self.active_profile = normalize_profile_name(self.active_profile.as_deref());
        for profile in self.profiles.values_mut() {
            profile.normalize();
        }
        self
    }
}

impl CliProfile {
    /// Stored value for a `FAVSYNC_*` repository variable.
    pub fn value_for(&self, env_name: &str) -> Option<String> {
        let value = match env_name {
            ENV_REPO_OWNER => &self.repo_owner,
            ENV_REPO_NAME => &self.repo_name,
            ENV_DATA_BRANCH => &self.data_branch,
            ENV_API_BASE_URL => &self.api_base_url,
            _ => return None,
        };
        normalize_text_option(value.clone())
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.value_for(ENV_REPO_OWNER).is_none() {
            missing.push("repo_owner");
        }
        if self.value_for(ENV_REPO_NAME).is_none() {
            missing.push("repo_name");
        }
        missing
    }

    fn normalize(&mut self) {
        self.repo_owner = normalize_text_option(self.repo_owner.clone());
        self.repo_name = normalize_text_option(self.repo_name.clone());
        self.data_branch = normalize_text_option(self.data_branch.clone());
        self.api_base_url = normalize_text_option(self.api_base_url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_profile_name_rejects_empty() {
        assert_eq!(normalize_profile_name(None), None);
        assert_eq!(normalize_profile_name(Some(" ")), None);
        assert_eq!(
            normalize_profile_name(Some(" work ")),
            Some("work".to_string())
        );
    }

    #[test]
    fn config_roundtrip_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = CliProfilesConfig {
            version: 1,
            active_profile: Some(" default ".to_string()),
            profiles: BTreeMap::new(),
        };
        config.profiles.insert(
            "default".to_string(),
            CliProfile {
                repo_owner: Some(" octo ".to_string()),
                repo_name: Some("papers".to_string()),
                data_branch: Some("   ".to_string()),
                api_base_url: Some(" https://ghe.example.com/api/v3 ".to_string()),
            },
        );

        config.save_to_path(&path).unwrap();
        let loaded = CliProfilesConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.active_profile.as_deref(), Some("default"));

        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.repo_owner.as_deref(), Some("octo"));
        assert_eq!(profile.repo_name.as_deref(), Some("papers"));
        assert_eq!(profile.data_branch, None);
        assert_eq!(
            profile.api_base_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliProfilesConfig::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, CliProfilesConfig::default());
    }

    #[test]
    fn unparseable_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{not json").unwrap();
        let error = CliProfilesConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(error, ProfileConfigError::Parse { .. }));
        assert!(error.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn resolve_profile_name_prefers_explicit_then_env_then_active() {
        let config = CliProfilesConfig {
            version: 1,
            active_profile: Some("work".to_string()),
            profiles: BTreeMap::new(),
        };
        assert_eq!(
            config.resolve_profile_name_with_env(Some("laptop"), Some("ci")),
            "laptop"
        );
        assert_eq!(config.resolve_profile_name_with_env(None, Some("ci")), "ci");
        assert_eq!(config.resolve_profile_name_with_env(None, Some(" ")), "work");
        assert_eq!(
            CliProfilesConfig::default().resolve_profile_name_with_env(None, None),
            DEFAULT_PROFILE
        );
    }

    #[test]
    fn value_for_maps_env_names_to_fields() {
        let profile = CliProfile {
            repo_owner: Some("octo".to_string()),
            repo_name: None,
            data_branch: Some("favorites".to_string()),
            api_base_url: None,
        };
        assert_eq!(profile.value_for(ENV_REPO_OWNER).as_deref(), Some("octo"));
        assert_eq!(profile.value_for(ENV_REPO_NAME), None);
        assert_eq!(
            profile.value_for(ENV_DATA_BRANCH).as_deref(),
            Some("favorites")
        );
        assert_eq!(profile.value_for("FAVSYNC_UNKNOWN"), None);
        assert_eq!(profile.missing_fields(), vec!["repo_name"]);
    }
}
