//! Channel records: sync upserts, tag and rating edits, listing.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Database, DbError};

/// A subscribed channel with user-assigned tags and rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub tags: Vec<String>,
    pub rating: Option<i64>,
}

impl Database {
    /// Insert a new channel, or update title/thumbnail of an existing one.
    /// Tags and rating are never touched by sync upserts.
    pub fn upsert_channel(
        &self,
        channel_id: &str,
        title: &str,
        thumbnail_url: &str,
    ) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO channels (channel_id, title, thumbnail_url, tags) VALUES (?1, ?2, ?3, '[]')
                 ON CONFLICT(channel_id) DO UPDATE SET title = ?2, thumbnail_url = ?3, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![channel_id, title, thumbnail_url],
            )?;
            Ok(())
        })
    }

    /// Replace a channel's tag set. Input is trimmed, deduplicated and
    /// sorted before storage; the stored list is returned.
    pub fn set_channel_tags(
        &self,
        channel_id: &str,
        tags: &[String],
    ) -> Result<Vec<String>, DbError> {
        let normalized = normalize_tags(tags);
        let tags_json = serde_json::to_string(&normalized).unwrap_or_else(|_| "[]".into());
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE channels SET tags = ?1, updated_at = CURRENT_TIMESTAMP WHERE channel_id = ?2",
                rusqlite::params![tags_json, channel_id],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("channel {channel_id}")));
            }
            Ok(())
        })?;
        tracing::info!(channel_id, tags = %tags_json, "Updated channel tags");
        Ok(normalized)
    }

    /// Set or clear a channel's rating. `Some` must be in 1..=5.
    pub fn set_channel_rating(
        &self,
        channel_id: &str,
        rating: Option<i64>,
    ) -> Result<(), DbError> {
        if let Some(r) = rating {
            if !(1..=5).contains(&r) {
                return Err(DbError::InvalidData(format!(
                    "rating must be between 1 and 5, got {r}"
                )));
            }
        }
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE channels SET rating = ?1, updated_at = CURRENT_TIMESTAMP WHERE channel_id = ?2",
                rusqlite::params![rating, channel_id],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("channel {channel_id}")));
            }
            Ok(())
        })
    }

    /// Get a single channel by id.
    pub fn get_channel(&self, channel_id: &str) -> Result<Option<Channel>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, title, thumbnail_url, tags, rating FROM channels WHERE channel_id = ?1",
            )?;
            let channel = stmt.query_row([channel_id], row_to_channel).optional()?;
            Ok(channel)
        })
    }

    /// All channels ordered by title, case-insensitive ascending.
    pub fn get_all_channels(&self) -> Result<Vec<Channel>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT channel_id, title, thumbnail_url, tags, rating FROM channels
                 ORDER BY title COLLATE NOCASE ASC",
            )?;
            let channels = stmt
                .query_map([], row_to_channel)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(channels)
        })
    }

    /// The full set of stored channel ids, for reconciliation.
    pub fn get_all_channel_ids(&self) -> Result<HashSet<String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT channel_id FROM channels")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<HashSet<_>, _>>()?;
            Ok(ids)
        })
    }

    /// Sorted distinct tags across all channels.
    pub fn get_unique_tags(&self) -> Result<Vec<String>, DbError> {
        let channels = self.get_all_channels()?;
        let unique: BTreeSet<String> = channels.into_iter().flat_map(|c| c.tags).collect();
        Ok(unique.into_iter().collect())
    }

    /// Delete a channel. Deleting a nonexistent id is not an error.
    pub fn delete_channel(&self, channel_id: &str) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM channels WHERE channel_id = ?1",
                [channel_id],
            )?;
            if removed > 0 {
                tracing::info!(channel_id, "Deleted channel");
            }
            Ok(())
        })
    }
}

/// Trim, drop empties, deduplicate and sort a raw tag list.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let unique: BTreeSet<String> = tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    unique.into_iter().collect()
}

fn row_to_channel(row: &rusqlite::Row<'_>) -> Result<Channel, rusqlite::Error> {
    let tags_json: String = row.get(3)?;
    Ok(Channel {
        channel_id: row.get(0)?,
        title: row.get(1)?,
        thumbnail_url: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        tags: serde_json::from_str(&tags_json).unwrap_or_default(),
        rating: row.get(4)?,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
