//! Note model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{blank_id, present},
};

/// Note entity as persisted
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New note creation payload; `completed` always starts false
#[derive(Debug, Clone)]
pub struct NewNote {
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
}

/// Request for note creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default, deserialize_with = "blank_id")]
    pub user: Option<Uuid>,
    pub title: Option<String>,
    pub text: Option<String>,
}

impl CreateNoteRequest {
    pub fn validate(self) -> ApiResult<NewNote> {
        match (self.user, present(self.title), present(self.text)) {
            (Some(user_id), Some(title), Some(text)) => Ok(NewNote {
                user_id,
                title,
                text,
            }),
            _ => Err(ApiError::all_fields_required()),
        }
    }
}

/// Request for note update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, deserialize_with = "blank_id")]
    pub user: Option<Uuid>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// Validated note update input
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

impl UpdateNoteRequest {
    pub fn validate(self) -> ApiResult<UpdateNote> {
        match (
            self.user,
            present(self.title),
            present(self.text),
            self.completed,
        ) {
            (Some(user_id), Some(title), Some(text), Some(completed)) => Ok(UpdateNote {
                user_id,
                title,
                text,
                completed,
            }),
            _ => Err(ApiError::all_fields_required()),
        }
    }
}

/// Note annotated with its owner's username
///
/// `username` is `None` when the owning user could not be resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: Option<String>,
}

impl NoteResponse {
    pub fn annotate(note: Note, username: Option<String>) -> Self {
        Self {
            id: note.id,
            user: note.user_id,
            title: note.title,
            text: note.text,
            completed: note.completed,
            created_at: note.created_at,
            updated_at: note.updated_at,
            username,
        }
    }
}

/// Response for note listing
#[derive(Debug, Clone, Serialize)]
pub struct NoteListResponse {
    pub count: usize,
    pub notes: Vec<NoteResponse>,
}
