//! Tag display colors. A color row may outlive the last channel using its tag.

use std::collections::HashMap;

use crate::{Database, DbError};

/// Color used by the frontend for tags without an explicit color.
pub const DEFAULT_TAG_COLOR: &str = "#cccccc";

impl Database {
    /// Save or update the color for a tag. Accepts `#rgb` or `#rrggbb`.
    pub fn set_tag_color(&self, tag: &str, color: &str) -> Result<(), DbError> {
        if !is_valid_hex_color(color) {
            return Err(DbError::InvalidData(format!(
                "invalid color {color:?}, expected #rgb or #rrggbb"
            )));
        }
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tag_colors (tag, color, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
                 ON CONFLICT(tag) DO UPDATE SET color = ?2, updated_at = CURRENT_TIMESTAMP",
                rusqlite::params![tag, color],
            )?;
            Ok(())
        })?;
        tracing::info!(tag, color, "Set tag color");
        Ok(())
    }

    /// Map of tag name to assigned color.
    pub fn get_tag_colors(&self) -> Result<HashMap<String, String>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT tag, color FROM tag_colors")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            let mut colors = HashMap::new();
            for row in rows {
                let (tag, color) = row?;
                colors.insert(tag, color);
            }
            Ok(colors)
        })
    }
}

/// `#rgb` or `#rrggbb`, hex digits only.
fn is_valid_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_format() {
        assert!(is_valid_hex_color("#abc"));
        assert!(is_valid_hex_color("#AABB00"));
        assert!(is_valid_hex_color("#cccccc"));

        assert!(!is_valid_hex_color("abc"));
        assert!(!is_valid_hex_color("#ab"));
        assert!(!is_valid_hex_color("#abcd"));
        assert!(!is_valid_hex_color("#ggg"));
        assert!(!is_valid_hex_color(""));
    }
}
