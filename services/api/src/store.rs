//! Persistence ports consumed by the services
//!
//! The services only ever see these traits; PostgreSQL and in-memory
//! adapters live in [`crate::repositories`].

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{
    note::{NewNote, Note},
    user::{NewUser, User},
};

/// Port for user persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> DatabaseResult<Vec<User>>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;
    /// Batch lookup; ids that do not resolve are simply absent from the result
    async fn find_by_ids(&self, ids: &[Uuid]) -> DatabaseResult<Vec<User>>;
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;
    async fn insert(&self, user: NewUser) -> DatabaseResult<User>;
    /// Overwrite every mutable field of an existing user; `None` if the row is gone
    async fn save(&self, user: &User) -> DatabaseResult<Option<User>>;
    /// Returns false if nothing was deleted
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// Port for note persistence
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn find_all(&self) -> DatabaseResult<Vec<Note>>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Note>>;
    async fn find_by_title(&self, title: &str) -> DatabaseResult<Option<Note>>;
    /// Any one note owned by the user, used to guard user deletion
    async fn find_one_by_user(&self, user_id: Uuid) -> DatabaseResult<Option<Note>>;
    async fn insert(&self, note: NewNote) -> DatabaseResult<Note>;
    /// `None` if the row is gone
    async fn save(&self, note: &Note) -> DatabaseResult<Option<Note>>;
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}
