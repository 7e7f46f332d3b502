use chrono::{DateTime, Utc};
use serde::Serialize;

/// Maximum length of a board title
pub const MAX_TITLE_LEN: usize = 100;
/// Maximum length of a board description
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A board as stored in the database
#[derive(Debug, Clone)]
pub struct Board {
    /// 12 random bytes, URL-safe base64 without padding (16 chars).
    /// Immutable once assigned.
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub last_edit_at: DateTime<Utc>,
    pub user_id: i64,
}

/// Board representation returned to clients
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardModel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub last_edit_date: DateTime<Utc>,
}

impl From<Board> for BoardModel {
    fn from(board: Board) -> Self {
        Self {
            id: board.id,
            title: board.title,
            description: board.description,
            creation_date: board.created_at,
            last_edit_date: board.last_edit_at,
        }
    }
}
