//! Note database operations

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult};

use super::super::Database;
use crate::models::Note;

impl Database {
    /// Create a note on a board, stamping the owner's access token and
    /// both timestamps. The assigned id comes back on the returned note.
    pub fn create_note(
        &self,
        board_id: &str,
        caption: &str,
        content: &str,
        access_token: &str,
    ) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO notes (caption, content, access_token, created_at, last_edit_at, board_id)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5)",
            rusqlite::params![caption, content, access_token, &now_str, board_id],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            caption: caption.to_string(),
            content: content.to_string(),
            access_token: access_token.to_string(),
            created_at: now,
            last_edit_at: now,
            board_id: board_id.to_string(),
        })
    }

    /// All notes on a board, oldest first
    pub fn list_notes(&self, board_id: &str) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, caption, content, access_token, created_at, last_edit_at, board_id
             FROM notes WHERE board_id = ?1 ORDER BY id ASC",
        )?;

        let notes = stmt
            .query_map([board_id], Self::row_to_note)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(notes)
    }

    /// Ids of the notes on a board whose stored token matches the caller's
    pub fn list_owned_note_ids(
        &self,
        board_id: &str,
        access_token: &str,
    ) -> SqliteResult<Vec<i64>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id FROM notes WHERE board_id = ?1 AND access_token = ?2 ORDER BY id ASC",
        )?;

        let ids = stmt
            .query_map([board_id, access_token], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(ids)
    }

    /// Look up a note by id, scoped to a board
    pub fn get_note(&self, board_id: &str, note_id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        conn.prepare(
            "SELECT id, caption, content, access_token, created_at, last_edit_at, board_id
             FROM notes WHERE board_id = ?1 AND id = ?2",
        )?
        .query_row(rusqlite::params![board_id, note_id], Self::row_to_note)
        .optional()
    }

    /// Replace a note's caption and content and refresh its edit date.
    /// The access token is immutable and never touched here; the ownership
    /// check happens at the controller before this is called.
    pub fn update_note(&self, note_id: i64, caption: &str, content: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        let rows_affected = conn.execute(
            "UPDATE notes SET caption = ?1, content = ?2, last_edit_at = ?3 WHERE id = ?4",
            rusqlite::params![caption, content, &now_str, note_id],
        )?;

        Ok(rows_affected > 0)
    }

    /// Delete a note
    pub fn delete_note(&self, note_id: i64) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", [note_id])?;
        Ok(rows_affected > 0)
    }

    /// How many notes a board currently holds (for the per-board cap)
    pub fn count_notes(&self, board_id: &str) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();

        conn.prepare("SELECT COUNT(*) FROM notes WHERE board_id = ?1")?
            .query_row([board_id], |row| row.get(0))
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let created_at_str: String = row.get(4)?;
        let last_edit_at_str: String = row.get(5)?;

        Ok(Note {
            id: row.get(0)?,
            caption: row.get(1)?,
            content: row.get(2)?,
            access_token: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            last_edit_at: DateTime::parse_from_rfc3339(&last_edit_at_str)
                .unwrap()
                .with_timezone(&Utc),
            board_id: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use tempfile::tempdir;

    fn board_db() -> (tempfile::TempDir, Database, String) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::new(db_path.to_str().unwrap()).expect("Failed to open database");

        let user = db.create_user("alice", "hash").unwrap();
        let board = db.create_board("Board", "", user.id).unwrap();
        let board_id = board.id;

        (dir, db, board_id)
    }

    #[test]
    fn test_note_crud() {
        let (_dir, db, board_id) = board_db();

        let note = db.create_note(&board_id, "Hi", "", "T1").unwrap();
        assert!(note.id > 0);

        let notes = db.list_notes(&board_id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].caption, "Hi");
        assert_eq!(notes[0].content, "");
        assert_eq!(notes[0].board_id, board_id);

        assert!(db.update_note(note.id, "Hi", "updated").unwrap());
        let updated = db.get_note(&board_id, note.id).unwrap().unwrap();
        assert_eq!(updated.content, "updated");
        assert_eq!(updated.access_token, "T1");
        assert!(updated.last_edit_at >= updated.created_at);

        assert!(db.delete_note(note.id).unwrap());
        assert!(db.get_note(&board_id, note.id).unwrap().is_none());
        assert!(!db.delete_note(note.id).unwrap());
    }

    #[test]
    fn test_owned_note_ids_filter_by_token() {
        let (_dir, db, board_id) = board_db();

        let n1 = db.create_note(&board_id, "one", "", "T1").unwrap();
        let n2 = db.create_note(&board_id, "two", "", "T2").unwrap();

        assert_eq!(db.list_owned_note_ids(&board_id, "T1").unwrap(), vec![n1.id]);
        assert_eq!(db.list_owned_note_ids(&board_id, "T2").unwrap(), vec![n2.id]);
        assert!(db.list_owned_note_ids(&board_id, "T3").unwrap().is_empty());
    }

    #[test]
    fn test_get_note_is_board_scoped() {
        let (_dir, db, board_id) = board_db();

        let user = db.create_user("bob", "hash").unwrap();
        let other = db.create_board("Other", "", user.id).unwrap();
        let note = db.create_note(&board_id, "Hi", "", "T1").unwrap();

        assert!(db.get_note(&other.id, note.id).unwrap().is_none());
        assert!(db.get_note(&board_id, note.id).unwrap().is_some());
    }

    #[test]
    fn test_count_notes() {
        let (_dir, db, board_id) = board_db();

        assert_eq!(db.count_notes(&board_id).unwrap(), 0);
        db.create_note(&board_id, "a", "", "T1").unwrap();
        db.create_note(&board_id, "b", "", "T1").unwrap();
        assert_eq!(db.count_notes(&board_id).unwrap(), 2);
    }
}
