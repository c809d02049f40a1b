//! Base64 transport encoding for document content

use base64::prelude::*;

use super::{RemoteError, RemoteResult};

/// Encode UTF-8 text as standard base64.
pub fn encode_content(text: &str) -> String {
    BASE64_STANDARD.encode(text.as_bytes())
}

/// Decode base64 content as returned by the contents API.
///
/// The API wraps encoded content in lines, so whitespace is ignored.
pub fn decode_content(encoded: &str) -> RemoteResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64_STANDARD
        .decode(compact)
        .map_err(|error| RemoteError::InvalidPayload(format!("invalid base64 content: {error}")))?;
    String::from_utf8(bytes)
        .map_err(|error| RemoteError::InvalidPayload(format!("content is not UTF-8: {error}")))
}
