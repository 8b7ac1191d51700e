//! In-process store for tests and database-less local runs
//!
//! Mirrors the constraints of the PostgreSQL schema: unique usernames,
//! unique titles, and a restricting foreign key from notes to users.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    models::{
        note::{NewNote, Note},
        user::{NewUser, User},
    },
    store::{NoteStore, UserStore},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    notes: Vec<Note>,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn title_taken(&self, title: &str, except: Option<Uuid>) -> bool {
        self.notes
            .iter()
            .any(|n| n.title == title && Some(n.id) != except)
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// Store holding users and notes in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_violation(constraint: &str) -> DatabaseError {
    DatabaseError::UniqueViolation(constraint.to_string())
}

fn foreign_key_violation() -> DatabaseError {
    DatabaseError::ForeignKeyViolation("notes_user_id_fkey".to_string())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_all(&self) -> DatabaseResult<Vec<User>> {
        Ok(self.tables.lock().await.users.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> DatabaseResult<Vec<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> DatabaseResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.username_taken(&new_user.username, None) {
            return Err(unique_violation("users_username_key"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            roles: new_user.roles,
            active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> DatabaseResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(unique_violation("users_username_key"));
        }

        let Some(stored) = tables.users.iter_mut().find(|u| u.id == user.id) else {
            return Ok(None);
        };
        stored.username = user.username.clone();
        stored.password_hash = user.password_hash.clone();
        stored.roles = user.roles.clone();
        stored.active = user.active;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        if tables.notes.iter().any(|n| n.user_id == id) {
            return Err(foreign_key_violation());
        }

        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        Ok(tables.users.len() < before)
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn find_all(&self) -> DatabaseResult<Vec<Note>> {
        Ok(self.tables.lock().await.notes.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Note>> {
        let tables = self.tables.lock().await;
        Ok(tables.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> DatabaseResult<Option<Note>> {
        let tables = self.tables.lock().await;
        Ok(tables.notes.iter().find(|n| n.title == title).cloned())
    }

    async fn find_one_by_user(&self, user_id: Uuid) -> DatabaseResult<Option<Note>> {
        let tables = self.tables.lock().await;
        Ok(tables.notes.iter().find(|n| n.user_id == user_id).cloned())
    }

    async fn insert(&self, new_note: NewNote) -> DatabaseResult<Note> {
        let mut tables = self.tables.lock().await;
        if !tables.user_exists(new_note.user_id) {
            return Err(foreign_key_violation());
        }
        if tables.title_taken(&new_note.title, None) {
            return Err(unique_violation("notes_title_key"));
        }

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: new_note.user_id,
            title: new_note.title,
            text: new_note.text,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn save(&self, note: &Note) -> DatabaseResult<Option<Note>> {
        let mut tables = self.tables.lock().await;
        if !tables.user_exists(note.user_id) {
            return Err(foreign_key_violation());
        }
        if tables.title_taken(&note.title, Some(note.id)) {
            return Err(unique_violation("notes_title_key"));
        }

        let Some(stored) = tables.notes.iter_mut().find(|n| n.id == note.id) else {
            return Ok(None);
        };
        stored.user_id = note.user_id;
        stored.title = note.title.clone();
        stored.text = note.text.clone();
        stored.completed = note.completed;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.notes.len();
        tables.notes.retain(|n| n.id != id);
        Ok(tables.notes.len() < before)
    }
}
