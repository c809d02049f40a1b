//! Remote favorites document model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FavoriteId;
use crate::util::scalar_text;

/// Schema version written into every document.
pub const DOCUMENT_VERSION: u32 = 1;

/// One favorited paper as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteItem {
    #[serde(alias = "paperId")]
    pub paper_id: FavoriteId,
    /// Set once when the paper first reaches the remote document
    #[serde(default, alias = "addedAt")]
    pub added_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "absUrl")]
    pub abs_url: String,
    #[serde(default)]
    pub date: String,
}

/// The per-user document. Replaced wholesale on every sync.
///
/// Field order is the canonical serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteDocument {
    pub version: u32,
    pub owner: String,
    #[serde(alias = "updatedAt")]
    pub updated_at: String,
    pub items: Vec<FavoriteItem>,
}

impl FavoriteDocument {
    /// Pretty-printed JSON with two-space indentation, as committed remotely.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a stored document without trusting its shape.
    ///
    /// Returns `None` when the text is not a JSON object. Items lacking a
    /// usable `paper_id` are dropped and missing text fields become empty.
    pub fn from_json_lossy(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        let object = value.as_object()?;

        let version = object
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|version| u32::try_from(version).ok())
            .unwrap_or(DOCUMENT_VERSION);

        Some(Self {
            version,
            owner: text_field(object, &["owner"]),
            updated_at: text_field(object, &["updated_at", "updatedAt"]),
            items: object
                .get("items")
                .map(normalize_remote_items)
                .unwrap_or_default(),
        })
    }

    pub fn item(&self, paper_id: &str) -> Option<&FavoriteItem> {
        self.items
            .iter()
            .find(|item| item.paper_id.as_str() == paper_id)
    }

    pub fn paper_ids(&self) -> Vec<FavoriteId> {
        self.items.iter().map(|item| item.paper_id.clone()).collect()
    }
}

/// One read snapshot of the remote document.
///
/// `hash` is the optimistic concurrency token a later write must present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentHandle {
    pub exists: bool,
    pub hash: Option<String>,
    pub document: Option<FavoriteDocument>,
}

impl ContentHandle {
    /// Snapshot of a document that has never been written.
    pub const fn missing() -> Self {
        Self {
            exists: false,
            hash: None,
            document: None,
        }
    }

    pub fn items(&self) -> &[FavoriteItem] {
        self.document
            .as_ref()
            .map(|document| document.items.as_slice())
            .unwrap_or_default()
    }
}

fn normalize_remote_items(value: &Value) -> Vec<FavoriteItem> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let paper_id = FavoriteId::parse(&text_field(item, &["paper_id", "paperId"]))?;
            Some(FavoriteItem {
                paper_id,
                added_at: text_field(item, &["added_at", "addedAt"]),
                title: text_field(item, &["title"]),
                abs_url: text_field(item, &["abs_url", "absUrl"]),
                date: text_field(item, &["date"]),
            })
        })
        .collect()
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(scalar_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(paper_id: &str, added_at: &str) -> FavoriteItem {
        FavoriteItem {
            paper_id: FavoriteId::parse(paper_id).unwrap(),
            added_at: added_at.to_string(),
            title: format!("Title {paper_id}"),
            abs_url: String::new(),
            date: String::new(),
        }
    }

    #[test]
    fn canonical_json_keeps_schema_key_order() {
        let document = FavoriteDocument {
            version: DOCUMENT_VERSION,
            owner: "octocat".to_string(),
            updated_at: "2024-02-01T00:00:00.000Z".to_string(),
            items: vec![item("a", "2024-01-01T00:00:00Z")],
        };
        let json = document.to_canonical_json().unwrap();

        let expected = r#"{
  "version": 1,
  "owner": "octocat",
  "updated_at": "2024-02-01T00:00:00.000Z",
  "items": [
    {
      "paper_id": "a",
      "added_at": "2024-01-01T00:00:00Z",
      "title": "Title a",
      "abs_url": "",
      "date": ""
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn lossy_parse_drops_items_without_paper_id() {
        let text = r#"{
            "version": 1,
            "owner": "octocat",
            "updated_at": "2024-02-01T00:00:00Z",
            "items": [
                {"paper_id": " a ", "added_at": "2024-01-01T00:00:00Z"},
                {"paper_id": ""},
                {"title": "orphan"},
                "not-an-object",
                {"paper_id": 2401.5, "title": null}
            ]
        }"#;
        let document = FavoriteDocument::from_json_lossy(text).unwrap();
        assert_eq!(document.paper_ids().len(), 2);
        assert_eq!(document.items[0].paper_id.as_str(), "a");
        assert_eq!(document.items[0].added_at, "2024-01-01T00:00:00Z");
        assert_eq!(document.items[0].title, "");
        assert_eq!(document.items[1].paper_id.as_str(), "2401.5");
    }

    #[test]
    fn lossy_parse_accepts_camel_case_fields() {
        let text = r#"{"owner":"o","updatedAt":"t","items":[{"paperId":"a","addedAt":"x","absUrl":"u"}]}"#;
        let document = FavoriteDocument::from_json_lossy(text).unwrap();
        assert_eq!(document.version, DOCUMENT_VERSION);
        assert_eq!(document.updated_at, "t");
        let first = document.item("a").unwrap();
        assert_eq!(first.added_at, "x");
        assert_eq!(first.abs_url, "u");
    }

    #[test]
    fn lossy_parse_rejects_non_objects() {
        assert!(FavoriteDocument::from_json_lossy("not json").is_none());
        assert!(FavoriteDocument::from_json_lossy("[1,2]").is_none());
    }

    #[test]
    fn missing_handle_has_no_items() {
        let handle = ContentHandle::missing();
        assert!(!handle.exists);
        assert!(handle.hash.is_none());
        assert!(handle.items().is_empty());
    }
}
