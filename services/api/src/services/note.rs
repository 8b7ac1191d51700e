//! Note lifecycle: ownership checks, title uniqueness and username enrichment

use std::{collections::HashSet, sync::Arc};

use common::error::DatabaseError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        MessageResponse,
        note::{CreateNoteRequest, NoteListResponse, NoteResponse, UpdateNoteRequest},
    },
    services::{EMPTY_LIST_IS_NOT_FOUND, UserService},
    store::NoteStore,
};

const TITLE_TAKEN: &str = "Title already exists";
const NOTE_NOT_FOUND: &str = "Note not found";
const USER_NOT_FOUND: &str = "User not found";

/// Service owning the note invariants
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
    users: UserService,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>, users: UserService) -> Self {
        Self { notes, users }
    }

    /// All notes annotated with their owner's username
    ///
    /// Owners are fetched in one batch; a note whose owner is gone is still
    /// listed, with no username.
    pub async fn list(&self) -> ApiResult<NoteListResponse> {
        let notes = self.notes.find_all().await?;
        if notes.is_empty() && EMPTY_LIST_IS_NOT_FOUND {
            return Err(ApiError::NotFound("No notes found".to_string()));
        }

        let owner_ids: Vec<Uuid> = notes
            .iter()
            .map(|n| n.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let usernames = self.users.usernames(&owner_ids).await?;

        let notes: Vec<NoteResponse> = notes
            .into_iter()
            .map(|note| {
                let username = usernames.get(&note.user_id).cloned();
                NoteResponse::annotate(note, username)
            })
            .collect();

        Ok(NoteListResponse {
            count: notes.len(),
            notes,
        })
    }

    pub async fn get(&self, id: Uuid) -> ApiResult<NoteResponse> {
        let note = self
            .notes
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOTE_NOT_FOUND.to_string()))?;

        let owner = self
            .users
            .find_by_id(note.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

        Ok(NoteResponse::annotate(note, Some(owner.username)))
    }

    pub async fn create(&self, request: CreateNoteRequest) -> ApiResult<MessageResponse> {
        let new_note = request.validate()?;
        info!("Creating note '{}' for user {}", new_note.title, new_note.user_id);

        let owner = self
            .users
            .find_by_id(new_note.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

        if !owner.active {
            warn!("Rejected note for inactive user {}", owner.id);
            return Err(ApiError::Forbidden("User not active".to_string()));
        }

        if self.notes.find_by_title(&new_note.title).await?.is_some() {
            warn!("Rejected duplicate title: {}", new_note.title);
            return Err(ApiError::Conflict(TITLE_TAKEN.to_string()));
        }

        let note = self.notes.insert(new_note).await.map_err(write_error)?;

        info!("Created note {} ({})", note.title, note.id);
        Ok(MessageResponse::new("New note created"))
    }

    pub async fn update(&self, id: Uuid, request: UpdateNoteRequest) -> ApiResult<MessageResponse> {
        let input = request.validate()?;
        info!("Updating note: {}", id);

        let mut note = self
            .notes
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOTE_NOT_FOUND.to_string()))?;

        if let Some(duplicate) = self.notes.find_by_title(&input.title).await? {
            if duplicate.id != note.id {
                warn!("Rejected retitle of {} to taken title {}", note.id, input.title);
                return Err(ApiError::Conflict(TITLE_TAKEN.to_string()));
            }
        }

        note.user_id = input.user_id;
        note.title = input.title;
        note.text = input.text;
        note.completed = input.completed;

        let updated = self
            .notes
            .save(&note)
            .await
            .map_err(write_error)?
            .ok_or_else(|| ApiError::NotFound(NOTE_NOT_FOUND.to_string()))?;
        Ok(MessageResponse::new(format!("Note {} updated", updated.title)))
    }

    pub async fn delete(&self, id: Uuid) -> ApiResult<MessageResponse> {
        let note = self
            .notes
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOTE_NOT_FOUND.to_string()))?;

        if !self.notes.delete(id).await? {
            return Err(ApiError::NotFound(NOTE_NOT_FOUND.to_string()));
        }

        info!("Deleted note {} ({})", note.title, note.id);
        Ok(MessageResponse::new(format!(
            "Note {} with ID {} deleted",
            note.title, note.id
        )))
    }
}

/// Map constraint violations raised by the store onto the same errors the
/// pre-write checks produce.
fn write_error(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::UniqueViolation(_) => ApiError::Conflict(TITLE_TAKEN.to_string()),
        DatabaseError::ForeignKeyViolation(_) => ApiError::NotFound(USER_NOT_FOUND.to_string()),
        other => other.into(),
    }
}
