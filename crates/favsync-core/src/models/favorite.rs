//! Favorite identifier model

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a favorited paper.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FavoriteId(String);

impl FavoriteId {
    /// Trim the raw value, returning `None` when nothing is left.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FavoriteId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for FavoriteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FavoriteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl FromStr for FavoriteId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| "favorite id must not be empty".to_string())
    }
}

impl TryFrom<String> for FavoriteId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FavoriteId> for String {
    fn from(value: FavoriteId) -> Self {
        value.0
    }
}

/// Trim, drop empty entries and deduplicate, keeping first-seen order.
pub fn normalize_favorite_ids<I, S>(ids: I) -> Vec<FavoriteId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter_map(|value| FavoriteId::parse(value.as_ref()))
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
