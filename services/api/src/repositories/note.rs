//! PostgreSQL note repository

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::note::{NewNote, Note},
    store::NoteStore,
};

const NOTE_COLUMNS: &str = "id, user_id, title, text, completed, created_at, updated_at";

/// Note repository backed by the `notes` table
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    /// Create a new note repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteRepository {
    async fn find_all(&self) -> DatabaseResult<Vec<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Note>> {
        info!("Finding note by ID: {}", id);

        sqlx::query_as::<_, Note>(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn find_by_title(&self, title: &str) -> DatabaseResult<Option<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE title = $1"
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn find_one_by_user(&self, user_id: Uuid) -> DatabaseResult<Option<Note>> {
        sqlx::query_as::<_, Note>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = $1 LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn insert(&self, new_note: NewNote) -> DatabaseResult<Note> {
        info!("Inserting note: {}", new_note.title);

        sqlx::query_as::<_, Note>(&format!(
            r#"
            INSERT INTO notes (id, user_id, title, text)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new_note.user_id)
        .bind(&new_note.title)
        .bind(&new_note.text)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn save(&self, note: &Note) -> DatabaseResult<Option<Note>> {
        info!("Saving note: {}", note.id);

        sqlx::query_as::<_, Note>(&format!(
            r#"
            UPDATE notes
            SET user_id = $2, title = $3, text = $4, completed = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {NOTE_COLUMNS}
            "#
        ))
        .bind(note.id)
        .bind(note.user_id)
        .bind(&note.title)
        .bind(&note.text)
        .bind(note.completed)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting note: {}", id);

        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }
}
