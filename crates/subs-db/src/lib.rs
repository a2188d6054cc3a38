//! SQLite persistence layer for the subscription dashboard.

pub mod channels;
pub mod schema;
pub mod tag_colors;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

/// Thread-safe database handle wrapping a single SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.configure()?;
        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.configure()?;
        db.migrate()?;
        Ok(db)
    }

    /// Access the underlying connection with a closure.
    pub fn with_conn<F, R>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&Connection) -> Result<R, DbError>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }

    /// Access the underlying connection mutably (for transactions).
    pub fn with_conn_mut<F, R>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&mut Connection) -> Result<R, DbError>,
    {
        let mut conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&mut conn)
    }

    fn configure(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA busy_timeout=5000;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
    }

    fn migrate(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            schema::run_migrations(conn)?;
            Ok(())
        })
    }
}

/// Database error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test DB")
    }

    #[test]
    fn test_open_and_migrate() {
        let db = test_db();
        assert!(db.get_all_channels().unwrap().is_empty());
        assert!(db.get_tag_colors().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_preserves_tags_and_rating() {
        let db = test_db();
        db.upsert_channel("UC1", "First Title", "https://i.ytimg.com/a.jpg")
            .unwrap();
        db.set_channel_tags("UC1", &["music".into(), "live".into()])
            .unwrap();
        db.set_channel_rating("UC1", Some(4)).unwrap();

        // Re-sync with a new title must not touch tags or rating.
        db.upsert_channel("UC1", "Renamed Title", "https://i.ytimg.com/b.jpg")
            .unwrap();

        let all = db.get_all_channels().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Renamed Title");
        assert_eq!(all[0].thumbnail_url, "https://i.ytimg.com/b.jpg");
        assert_eq!(all[0].tags, vec!["live", "music"]);
        assert_eq!(all[0].rating, Some(4));
    }

    #[test]
    fn test_tag_normalization() {
        let db = test_db();
        db.upsert_channel("UC1", "Channel", "").unwrap();

        let stored = db
            .set_channel_tags(
                "UC1",
                &["b".into(), " a".into(), "a ".into(), "".into(), "  ".into()],
            )
            .unwrap();
        assert_eq!(stored, vec!["a", "b"]);

        let ch = db.get_channel("UC1").unwrap().unwrap();
        assert_eq!(ch.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_rating_validation() {
        let db = test_db();
        db.upsert_channel("UC1", "Channel", "").unwrap();

        db.set_channel_rating("UC1", Some(1)).unwrap();
        db.set_channel_rating("UC1", Some(5)).unwrap();
        assert!(matches!(
            db.set_channel_rating("UC1", Some(0)),
            Err(DbError::InvalidData(_))
        ));
        assert!(matches!(
            db.set_channel_rating("UC1", Some(6)),
            Err(DbError::InvalidData(_))
        ));

        db.set_channel_rating("UC1", None).unwrap();
        let ch = db.get_channel("UC1").unwrap().unwrap();
        assert_eq!(ch.rating, None);
    }

    #[test]
    fn test_tag_color_validation() {
        let db = test_db();
        db.set_tag_color("music", "#abc").unwrap();
        db.set_tag_color("music", "#aabbcc").unwrap();

        assert!(matches!(
            db.set_tag_color("music", "abc"),
            Err(DbError::InvalidData(_))
        ));
        assert!(matches!(
            db.set_tag_color("music", "#ab"),
            Err(DbError::InvalidData(_))
        ));
        assert!(matches!(
            db.set_tag_color("music", "#ggg"),
            Err(DbError::InvalidData(_))
        ));

        let colors = db.get_tag_colors().unwrap();
        assert_eq!(colors.get("music").map(String::as_str), Some("#aabbcc"));
    }

    #[test]
    fn test_colors_survive_channel_deletion() {
        let db = test_db();
        db.upsert_channel("UC1", "Channel", "").unwrap();
        db.set_channel_tags("UC1", &["news".into()]).unwrap();
        db.set_tag_color("news", "#336699").unwrap();

        db.delete_channel("UC1").unwrap();

        // Colors are not cascade-deleted with the last channel using the tag.
        let colors = db.get_tag_colors().unwrap();
        assert_eq!(colors.get("news").map(String::as_str), Some("#336699"));
    }

    #[test]
    fn test_listing_order_is_case_insensitive() {
        let db = test_db();
        db.upsert_channel("UC1", "banana", "").unwrap();
        db.upsert_channel("UC2", "Apple", "").unwrap();
        db.upsert_channel("UC3", "cherry", "").unwrap();

        let titles: Vec<String> = db
            .get_all_channels()
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_unique_tags() {
        let db = test_db();
        db.upsert_channel("UC1", "One", "").unwrap();
        db.upsert_channel("UC2", "Two", "").unwrap();
        db.set_channel_tags("UC1", &["music".into(), "live".into()])
            .unwrap();
        db.set_channel_tags("UC2", &["music".into(), "news".into()])
            .unwrap();

        assert_eq!(db.get_unique_tags().unwrap(), vec!["live", "music", "news"]);
    }

    #[test]
    fn test_edits_on_missing_channel_are_not_found() {
        let db = test_db();
        assert!(matches!(
            db.set_channel_tags("missing", &["a".into()]),
            Err(DbError::NotFound(_))
        ));
        assert!(matches!(
            db.set_channel_rating("missing", Some(3)),
            Err(DbError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let db = test_db();
        db.upsert_channel("UC1", "Channel", "").unwrap();
        db.delete_channel("UC1").unwrap();
        // Deleting an id that no longer exists is not an error.
        db.delete_channel("UC1").unwrap();
        db.delete_channel("never-existed").unwrap();

        assert!(db.get_all_channel_ids().unwrap().is_empty());
        assert!(db.get_all_channels().unwrap().is_empty());
    }
}
