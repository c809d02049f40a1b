//! GitHub contents API client

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use super::encoding::{decode_content, encode_content};
use super::{parse_api_error, RemoteContentStore, RemoteError, RemoteResult, WriteResult};
use crate::config::RepoConfig;
use crate::models::{ContentHandle, Credentials, FavoriteDocument};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("favsync/", env!("CARGO_PKG_VERSION"));

/// Reads and writes `favorites/<login>.json` on the configured data branch.
#[derive(Clone)]
pub struct GitHubContentClient {
    config: RepoConfig,
    client: Client,
}

impl GitHubContentClient {
    pub fn new(config: RepoConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { config, client })
    }

    pub const fn config(&self) -> &RepoConfig {
        &self.config
    }

    fn contents_url(&self, login: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base_url,
            urlencoding::encode(&self.config.repo_owner),
            urlencoding::encode(&self.config.repo_name),
            RepoConfig::favorites_path(&urlencoding::encode(login)),
        )
    }

    fn user_url(&self) -> String {
        format!("{}/user", self.config.api_base_url)
    }

    fn authorized(request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }
}

impl RemoteContentStore for GitHubContentClient {
    async fn read_document(&self, credentials: &Credentials) -> RemoteResult<ContentHandle> {
        let request = self
            .client
            .get(self.contents_url(&credentials.login))
            .query(&[("ref", self.config.data_branch.as_str())]);
        let response = Self::authorized(request, &credentials.token).send().await?;

        let status = response.status();
        let body = if status.is_success() {
            response.text().await?
        } else {
            response.text().await.unwrap_or_default()
        };
        let handle = classify_read_response(status, &body)?;
        if !handle.exists {
            tracing::debug!("No favorites document for {} yet", credentials.login);
        }
        Ok(handle)
    }

    async fn write_document(
        &self,
        credentials: &Credentials,
        document: &FavoriteDocument,
        expected_hash: Option<&str>,
    ) -> RemoteResult<WriteResult> {
        let content = document
            .to_canonical_json()
            .map_err(|error| RemoteError::InvalidPayload(error.to_string()))?;
        let payload = PutContentsRequest {
            message: format!("chore(favorites): update {} favorites", credentials.login),
            content: encode_content(&content),
            branch: &self.config.data_branch,
            sha: expected_hash,
        };

        let request = self
            .client
            .put(self.contents_url(&credentials.login))
            .json(&payload);
        let response = Self::authorized(request, &credentials.token).send().await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(classify_write_response(status, &body))
    }

    async fn validate_credentials(&self, token: &str) -> RemoteResult<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RemoteError::InvalidCredentials(
                "GitHub access token is required.".to_string(),
            ));
        }

        let request = self.client.get(self.user_url());
        let response = Self::authorized(request, token).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(RemoteError::InvalidCredentials(format!(
                "Token validation failed: {}",
                parse_api_error(status, &body)
            )));
        }

        parse_identity_response(&body)
    }
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    sha: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PutContentsResponse {
    #[serde(default)]
    content: Option<ContentsResponse>,
    #[serde(default)]
    commit: Option<CommitResponse>,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    committer: Option<CommitterResponse>,
}

#[derive(Debug, Deserialize)]
struct CommitterResponse {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    #[serde(default)]
    login: Option<String>,
}

fn parse_contents_response(body: &str) -> RemoteResult<ContentHandle> {
    let contents = serde_json::from_str::<ContentsResponse>(body)
        .map_err(|error| RemoteError::InvalidPayload(error.to_string()))?;
    let decoded = decode_content(contents.content.as_deref().unwrap_or_default())?;
    let document = FavoriteDocument::from_json_lossy(&decoded);
    if document.is_none() {
        tracing::warn!("Remote favorites document is not a JSON object; treating it as empty");
    }

    Ok(ContentHandle {
        exists: true,
        hash: contents.sha.filter(|sha| !sha.is_empty()),
        document,
    })
}

/// A missing document is a normal outcome; other failures carry the
/// upstream status and message.
fn classify_read_response(status: StatusCode, body: &str) -> RemoteResult<ContentHandle> {
    if status == StatusCode::NOT_FOUND {
        return Ok(ContentHandle::missing());
    }
    if !status.is_success() {
        return Err(RemoteError::Read {
            status: status.as_u16(),
            message: parse_api_error(status, body),
        });
    }
    parse_contents_response(body)
}

fn classify_write_response(status: StatusCode, body: &str) -> WriteResult {
    if status.is_success() {
        let payload = serde_json::from_str::<PutContentsResponse>(body).unwrap_or_default();
        return WriteResult::Accepted {
            content_hash: payload.content.and_then(|content| content.sha),
            committed_at: payload
                .commit
                .and_then(|commit| commit.committer)
                .and_then(|committer| committer.date),
        };
    }
    if status == StatusCode::CONFLICT {
        return WriteResult::Conflict;
    }
    WriteResult::Rejected {
        status: status.as_u16(),
        message: parse_api_error(status, body),
    }
}

fn parse_identity_response(body: &str) -> RemoteResult<String> {
    serde_json::from_str::<IdentityResponse>(body)
        .ok()
        .and_then(|identity| identity.login)
        .map(|login| login.trim().to_string())
        .filter(|login| !login.is_empty())
        .ok_or_else(|| {
            RemoteError::InvalidCredentials("Token validation failed: missing login.".to_string())
        })
}
