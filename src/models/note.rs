use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a note caption
pub const MAX_CAPTION_LEN: usize = 100;
/// Maximum length of a note content
pub const MAX_CONTENT_LEN: usize = 1000;
/// Maximum number of notes a single board may hold
pub const MAX_NOTES_PER_BOARD: i64 = 100;

/// A note as stored in the database.
/// The access token is the ownership capability and is never serialized
/// into any response.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: i64,
    pub caption: String,
    pub content: String,
    pub access_token: String,
    pub created_at: DateTime<Utc>,
    pub last_edit_at: DateTime<Utc>,
    pub board_id: String,
}

/// Note representation exchanged with clients (token stays server-side)
#[derive(Debug, Serialize, Deserialize)]
pub struct NoteModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub content: String,
}

impl From<&Note> for NoteModel {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            caption: note.caption.clone(),
            content: note.content.clone(),
        }
    }
}

/// Uniform response body for note mutations.
///
/// Ownership violations and the note cap deliberately ship as HTTP 200
/// with `success: false` so the client only has to branch on one field.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            value: None,
        }
    }

    /// Success response carrying the id assigned to a new note
    pub fn created(id: i64) -> Self {
        Self {
            success: true,
            message: None,
            value: Some(id),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            value: None,
        }
    }
}
