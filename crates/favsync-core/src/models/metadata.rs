//! Display metadata supplied alongside favorite IDs during a sync

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::FavoriteId;

/// Fresh metadata snapshot for one paper, usually taken from a paper index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "absUrl")]
    pub abs_url: Option<String>,
    /// Fallback link used when `abs_url` is absent
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl PaperMetadata {
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn abs_url(&self) -> Option<&str> {
        non_empty(self.abs_url.as_deref()).or_else(|| non_empty(self.url.as_deref()))
    }

    pub fn date(&self) -> Option<&str> {
        non_empty(self.date.as_deref())
    }
}

/// Metadata snapshots keyed by favorite ID.
pub type MetadataLookup = HashMap<FavoriteId, PaperMetadata>;

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_url_falls_back_to_url() {
        let metadata = PaperMetadata {
            abs_url: Some(String::new()),
            url: Some("https://arxiv.org/abs/2401.00001".to_string()),
            ..PaperMetadata::default()
        };
        assert_eq!(metadata.abs_url(), Some("https://arxiv.org/abs/2401.00001"));
        assert_eq!(metadata.title(), None);
    }
}
