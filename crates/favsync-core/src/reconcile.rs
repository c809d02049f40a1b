//! Turning local favorites plus prior remote state into the next document.
//!
//! Two policies live here on purpose:
//!
//! - [`reconcile`] builds the document that gets written. Local membership is
//!   authoritative, so IDs only present remotely are dropped.
//! - [`merge_favorite_ids`] is a read-only union used to show everything
//!   either side knows about before a sync. It never drops remote IDs.

use std::collections::HashMap;

use crate::models::{
    normalize_favorite_ids, FavoriteDocument, FavoriteId, FavoriteItem, MetadataLookup,
    DOCUMENT_VERSION,
};

/// Build the next remote document from the local ID list.
///
/// `added_at` is carried over from the remote item when the ID already
/// existed there, otherwise it is `now`. Display fields prefer the fresh
/// metadata snapshot, then the remote item, then a fallback (the ID itself
/// for `title`, empty otherwise).
pub fn reconcile<S: AsRef<str>>(
    login: &str,
    local_ids: &[S],
    remote_items: &[FavoriteItem],
    metadata: &MetadataLookup,
    now: &str,
) -> FavoriteDocument {
    let remote_by_id: HashMap<&str, &FavoriteItem> = remote_items
        .iter()
        .map(|item| (item.paper_id.as_str(), item))
        .collect();

    let items = normalize_favorite_ids(local_ids)
        .into_iter()
        .map(|paper_id| {
            let remote = remote_by_id.get(paper_id.as_str()).copied();
            let snapshot = metadata.get(paper_id.as_str());

            let added_at = remote
                .map(|item| item.added_at.as_str())
                .filter(|added_at| !added_at.is_empty())
                .unwrap_or(now)
                .to_string();
            let title = snapshot
                .and_then(|snapshot| snapshot.title())
                .or_else(|| remote.map(|item| item.title.as_str()))
                .filter(|title| !title.is_empty())
                .unwrap_or(paper_id.as_str())
                .to_string();
            let abs_url = snapshot
                .and_then(|snapshot| snapshot.abs_url())
                .or_else(|| remote.map(|item| item.abs_url.as_str()))
                .unwrap_or_default()
                .to_string();
            let date = snapshot
                .and_then(|snapshot| snapshot.date())
                .or_else(|| remote.map(|item| item.date.as_str()))
                .unwrap_or_default()
                .to_string();

            FavoriteItem {
                paper_id,
                added_at,
                title,
                abs_url,
                date,
            }
        })
        .collect();

    FavoriteDocument {
        version: DOCUMENT_VERSION,
        owner: login.to_string(),
        updated_at: now.to_string(),
        items,
    }
}

/// Union of remote and local IDs: remote order first, then new local IDs.
pub fn merge_favorite_ids<S: AsRef<str>>(
    local_ids: &[S],
    remote_items: &[FavoriteItem],
) -> Vec<FavoriteId> {
    let remote_ids = remote_items.iter().map(|item| item.paper_id.as_str());
    let local_ids = local_ids.iter().map(AsRef::<str>::as_ref);
    normalize_favorite_ids(remote_ids.chain(local_ids))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::PaperMetadata;

    const NOW: &str = "2024-06-01T12:00:00.000Z";

    fn remote(paper_id: &str, added_at: &str, title: &str) -> FavoriteItem {
        FavoriteItem {
            paper_id: FavoriteId::parse(paper_id).unwrap(),
            added_at: added_at.to_string(),
            title: title.to_string(),
            abs_url: format!("https://arxiv.org/abs/{paper_id}"),
            date: "2024-01-01".to_string(),
        }
    }

    fn ids_of(document: &FavoriteDocument) -> Vec<&str> {
        document
            .items
            .iter()
            .map(|item| item.paper_id.as_str())
            .collect()
    }

    #[test]
    fn new_document_uses_now_for_every_item() {
        let document = reconcile("octocat", &["a", "b"], &[], &MetadataLookup::new(), NOW);
        assert_eq!(document.version, 1);
        assert_eq!(document.owner, "octocat");
        assert_eq!(document.updated_at, NOW);
        assert_eq!(ids_of(&document), vec!["a", "b"]);
        assert!(document.items.iter().all(|item| item.added_at == NOW));
        assert_eq!(document.items[0].title, "a");
        assert_eq!(document.items[0].abs_url, "");
        assert_eq!(document.items[0].date, "");
    }

    #[test]
    fn existing_added_at_is_preserved() {
        let remote_items = [remote("a", "2024-01-01T00:00:00Z", "Paper A")];
        let document = reconcile("octocat", &["a"], &remote_items, &MetadataLookup::new(), NOW);
        assert_eq!(document.items[0].added_at, "2024-01-01T00:00:00Z");
        assert_eq!(document.items[0].title, "Paper A");
        assert_eq!(document.items[0].abs_url, "https://arxiv.org/abs/a");
    }

    #[test]
    fn remote_only_ids_are_dropped() {
        let remote_items = [
            remote("a", "2024-01-01T00:00:00Z", "Paper A"),
            remote("b", "2024-01-02T00:00:00Z", "Paper B"),
        ];
        let document = reconcile("octocat", &["a"], &remote_items, &MetadataLookup::new(), NOW);
        assert_eq!(ids_of(&document), vec!["a"]);
    }

    #[test]
    fn items_follow_normalized_local_order() {
        let remote_items = [
            remote("c", "2024-01-03T00:00:00Z", "C"),
            remote("a", "2024-01-01T00:00:00Z", "A"),
        ];
        let local = [" b ", "a", "", "b", "c", "d"];
        let document = reconcile("octocat", &local, &remote_items, &MetadataLookup::new(), NOW);
        assert_eq!(ids_of(&document), vec!["b", "a", "c", "d"]);
        assert_eq!(document.items[0].added_at, NOW);
        assert_eq!(document.items[1].added_at, "2024-01-01T00:00:00Z");
        assert_eq!(document.items[2].added_at, "2024-01-03T00:00:00Z");
    }

    #[test]
    fn fresh_metadata_wins_over_remote_fields() {
        let remote_items = [remote("a", "2024-01-01T00:00:00Z", "Old title")];
        let mut metadata = MetadataLookup::new();
        metadata.insert(
            FavoriteId::parse("a").unwrap(),
            PaperMetadata {
                title: Some("New title".to_string()),
                abs_url: None,
                url: Some("https://example.org/a".to_string()),
                date: Some(String::new()),
            },
        );

        let document = reconcile("octocat", &["a"], &remote_items, &metadata, NOW);
        let item = &document.items[0];
        assert_eq!(item.title, "New title");
        assert_eq!(item.abs_url, "https://example.org/a");
        assert_eq!(item.date, "2024-01-01");
        assert_eq!(item.added_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn empty_remote_title_falls_back_to_id() {
        let remote_items = [remote("a", "", "")];
        let document = reconcile("octocat", &["a"], &remote_items, &MetadataLookup::new(), NOW);
        assert_eq!(document.items[0].title, "a");
        assert_eq!(document.items[0].added_at, NOW);
    }

    #[test]
    fn merge_is_union_of_both_sides() {
        let remote_items = [
            remote("r1", "t", "R1"),
            remote("shared", "t", "Shared"),
        ];
        let merged = merge_favorite_ids(&["l1", "shared", " l2 ", ""], &remote_items);
        let merged: Vec<&str> = merged.iter().map(FavoriteId::as_str).collect();
        assert_eq!(merged, vec!["r1", "shared", "l1", "l2"]);
    }

    #[test]
    fn merge_result_set_does_not_depend_on_which_side_contributes() {
        let left = merge_favorite_ids(&["a", "b"], &[remote("c", "t", "C")]);
        let right = merge_favorite_ids(&["c", "b"], &[remote("a", "t", "A")]);
        let left: HashSet<FavoriteId> = left.into_iter().collect();
        let right: HashSet<FavoriteId> = right.into_iter().collect();
        assert_eq!(left, right);
    }
}
