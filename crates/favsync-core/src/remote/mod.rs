//! Remote content store holding one favorites document per user

mod encoding;
mod github;
mod memory;

pub use encoding::{decode_content, encode_content};
pub use github::GitHubContentClient;
pub use memory::MemoryContentStore;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ContentHandle, Credentials, FavoriteDocument};
use crate::util::compact_text;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store's shared state could not be accessed
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Read { status: u16, message: String },
    #[error("{0}")]
    InvalidCredentials(String),
    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Outcome of a conditional write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// The store accepted the new document.
    Accepted {
        /// Hash of the newly written content, when reported
        content_hash: Option<String>,
        /// Commit timestamp, when reported
        committed_at: Option<String>,
    },
    /// The expected hash was stale; someone else wrote since our read.
    Conflict,
    /// Any other failure (auth, payload too large, rate limit, ...).
    Rejected { status: u16, message: String },
}

/// Conditional read/write access to per-user favorites documents (async)
#[allow(async_fn_in_trait)]
pub trait RemoteContentStore {
    /// Read the current document and its hash.
    ///
    /// A document that does not exist yet is a normal outcome
    /// (`ContentHandle::missing()`), not an error.
    async fn read_document(&self, credentials: &Credentials) -> RemoteResult<ContentHandle>;

    /// Replace the document, conditional on `expected_hash` when given.
    async fn write_document(
        &self,
        credentials: &Credentials,
        document: &FavoriteDocument,
        expected_hash: Option<&str>,
    ) -> RemoteResult<WriteResult>;

    /// Resolve the login that owns `token`.
    async fn validate_credentials(&self, token: &str) -> RemoteResult<String>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Human-readable message for a failed API response.
pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.filter(|message| !message.trim().is_empty()) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_api_error_prefers_json_message() {
        let message = parse_api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com"}"#,
        );
        assert_eq!(message, "Bad credentials (401)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_then_status() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down (502)"
        );
        assert_eq!(parse_api_error(StatusCode::FORBIDDEN, "  "), "HTTP 403");
    }
}
