//! Database schema definitions and migrations.

use rusqlite::Connection;

use crate::DbError;

pub fn run_migrations(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS channels (
    channel_id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    thumbnail_url TEXT DEFAULT '',
    tags TEXT DEFAULT '[]',
    rating INTEGER,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS tag_colors (
    tag TEXT PRIMARY KEY,
    color TEXT NOT NULL DEFAULT '#cccccc',
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;
