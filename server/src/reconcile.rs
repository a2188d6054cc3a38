//! Reconciles local channel records against the upstream subscription list.

use std::collections::HashSet;

use serde::Serialize;
use subs_db::{Database, DbError};
use youtube_client::api::SubscriptionItem;

/// Counts from a completed reconciliation run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReconcileOutcome {
    pub fetched: usize,
    pub removed: usize,
    pub processed: usize,
}

/// Sync the store to the upstream subscription list.
///
/// Channels no longer present upstream are deleted first, then every
/// upstream item is upserted. Running twice with the same upstream data
/// leaves the store in the same state as running once. The delete and
/// upsert phases are separate transactions.
pub fn reconcile_channels(
    db: &Database,
    upstream: &[SubscriptionItem],
) -> Result<ReconcileOutcome, DbError> {
    let upstream_ids: HashSet<&str> = upstream.iter().map(|s| s.channel_id.as_str()).collect();
    let local_ids = db.get_all_channel_ids()?;

    let stale: Vec<String> = local_ids
        .into_iter()
        .filter(|id| !upstream_ids.contains(id.as_str()))
        .collect();
    for id in &stale {
        db.delete_channel(id)?;
    }
    if !stale.is_empty() {
        tracing::info!(removed = stale.len(), "Removed unsubscribed channels");
    }

    for item in upstream {
        db.upsert_channel(&item.channel_id, &item.title, &item.thumbnail_url)?;
    }

    Ok(ReconcileOutcome {
        fetched: upstream.len(),
        removed: stale.len(),
        processed: upstream.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> SubscriptionItem {
        SubscriptionItem {
            channel_id: id.into(),
            title: title.into(),
            thumbnail_url: format!("https://yt3.ggpht.com/{id}.jpg"),
        }
    }

    fn ids(db: &Database) -> Vec<String> {
        let mut ids: Vec<String> = db.get_all_channel_ids().unwrap().into_iter().collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_reconcile_adds_updates_and_removes() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_channel("A", "Channel A", "").unwrap();
        db.upsert_channel("C", "Channel C", "").unwrap();

        let upstream = vec![item("A", "Channel A v2"), item("B", "Channel B")];
        let outcome = reconcile_channels(&db, &upstream).unwrap();

        assert_eq!(outcome.fetched, 2);
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.processed, 2);
        assert_eq!(ids(&db), vec!["A", "B"]);

        let channels = db.get_all_channels().unwrap();
        let a = channels.iter().find(|c| c.channel_id == "A").unwrap();
        assert_eq!(a.title, "Channel A v2");
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_channel("A", "Channel A", "").unwrap();
        db.upsert_channel("C", "Channel C", "").unwrap();

        let upstream = vec![item("A", "Channel A"), item("B", "Channel B")];
        reconcile_channels(&db, &upstream).unwrap();
        let first = db.get_all_channels().unwrap();

        let outcome = reconcile_channels(&db, &upstream).unwrap();
        let second = db.get_all_channels().unwrap();

        assert_eq!(outcome.removed, 0);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.channel_id, b.channel_id);
            assert_eq!(a.title, b.title);
            assert_eq!(a.tags, b.tags);
            assert_eq!(a.rating, b.rating);
        }
    }

    #[test]
    fn test_reconcile_preserves_tags_and_rating() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_channel("A", "Channel A", "").unwrap();
        db.set_channel_tags("A", &["music".into()]).unwrap();
        db.set_channel_rating("A", Some(5)).unwrap();

        reconcile_channels(&db, &[item("A", "Channel A renamed")]).unwrap();

        let a = db.get_channel("A").unwrap().unwrap();
        assert_eq!(a.title, "Channel A renamed");
        assert_eq!(a.tags, vec!["music"]);
        assert_eq!(a.rating, Some(5));
    }

    #[test]
    fn test_reconcile_empty_upstream_clears_store() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_channel("A", "Channel A", "").unwrap();

        let outcome = reconcile_channels(&db, &[]).unwrap();
        assert_eq!(outcome.removed, 1);
        assert!(db.get_all_channels().unwrap().is_empty());
        assert!(db.get_all_channel_ids().unwrap().is_empty());
    }
}
