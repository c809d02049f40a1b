//! Shared utility functions used across multiple modules.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Parse persisted JSON, falling back when the text is missing or malformed.
///
/// Locally stored favorites are convenience data, so a corrupt value must
/// never turn into an error for the caller.
pub fn parse_or_default<T: DeserializeOwned>(text: Option<&str>, fallback: T) -> T {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return fallback;
    };
    serde_json::from_str(text).unwrap_or(fallback)
}

/// Text form of a JSON string or number. Other values have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_text_accepts_strings_and_numbers_only() {
        assert_eq!(scalar_text(&serde_json::json!("a")), Some("a".to_string()));
        assert_eq!(
            scalar_text(&serde_json::json!(2401.00001)),
            Some("2401.00001".to_string())
        );
        assert_eq!(scalar_text(&serde_json::json!(42)), Some("42".to_string()));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&serde_json::json!({"id": "a"})), None);
    }

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" https://example.com ".to_string())),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn parse_or_default_falls_back_on_missing_or_corrupt_text() {
        assert_eq!(parse_or_default::<Vec<String>>(None, Vec::new()), Vec::<String>::new());
        assert_eq!(parse_or_default::<Vec<String>>(Some("  "), Vec::new()), Vec::<String>::new());
        assert_eq!(
            parse_or_default::<Vec<String>>(Some("[\"a\""), vec!["fallback".to_string()]),
            vec!["fallback".to_string()]
        );
        assert_eq!(
            parse_or_default::<Vec<String>>(Some("{\"a\":1}"), Vec::new()),
            Vec::<String>::new()
        );
    }

    #[test]
    fn parse_or_default_returns_parsed_value() {
        assert_eq!(
            parse_or_default::<Vec<String>>(Some("[\"a\",\"b\"]"), Vec::new()),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn now_iso8601_uses_utc_suffix() {
        let now = now_iso8601();
        assert!(now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
