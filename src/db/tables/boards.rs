//! Board database operations

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use rand::RngCore;
use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::Board;

/// Generate a board id: 12 random bytes, URL-safe base64 without padding.
/// 96 bits of randomness makes ids unguessable and collisions are not
/// expected; a collision surfaces as a primary-key constraint error.
fn generate_board_id() -> String {
    let mut bytes = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut bytes);

    URL_SAFE_NO_PAD.encode(bytes)
}

impl Database {
    /// Create a board owned by `user_id`. Caller is responsible for
    /// trimming and validating title/description lengths.
    pub fn create_board(
        &self,
        title: &str,
        description: &str,
        user_id: i64,
    ) -> SqliteResult<Board> {
        let conn = self.conn.lock().unwrap();
        let id = generate_board_id();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO boards (id, title, description, created_at, last_edit_at, user_id)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5)",
            rusqlite::params![&id, title, description, &now_str, user_id],
        )?;

        Ok(Board {
            id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: now,
            last_edit_at: now,
            user_id,
        })
    }

    /// Look up a board by id. Public, no access control.
    pub fn get_board(&self, id: &str) -> SqliteResult<Option<Board>> {
        let conn = self.conn.lock().unwrap();

        conn.prepare(
            "SELECT id, title, description, created_at, last_edit_at, user_id
             FROM boards WHERE id = ?1",
        )?
        .query_row([id], Self::row_to_board)
        .optional()
    }

    /// All boards owned by a user, newest first
    pub fn list_boards_for_user(&self, user_id: i64) -> SqliteResult<Vec<Board>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, description, created_at, last_edit_at, user_id
             FROM boards WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;

        let boards = stmt
            .query_map([user_id], Self::row_to_board)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(boards)
    }

    /// Delete a board. Its notes go with it (ON DELETE CASCADE).
    pub fn delete_board(&self, id: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM boards WHERE id = ?1", [id])?;
        Ok(rows_affected > 0)
    }

    fn row_to_board(row: &rusqlite::Row) -> rusqlite::Result<Board> {
        let created_at_str: String = row.get(3)?;
        let last_edit_at_str: String = row.get(4)?;

        Ok(Board {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            last_edit_at: DateTime::parse_from_rfc3339(&last_edit_at_str)
                .unwrap()
                .with_timezone(&Utc),
            user_id: row.get(5)?,
        })
    }
}
