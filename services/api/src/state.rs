//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    middleware::TokenVerifier,
    password::PasswordHasher,
    services::{NoteService, UserService},
    store::{NoteStore, UserStore},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub note_service: NoteService,
    pub token_verifier: TokenVerifier,
}

impl AppState {
    /// Wire the services over the given stores
    pub fn new(
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
        hasher: PasswordHasher,
        token_verifier: TokenVerifier,
    ) -> Self {
        let user_service = UserService::new(users, notes.clone(), hasher);
        let note_service = NoteService::new(notes, user_service.clone());

        Self {
            user_service,
            note_service,
            token_verifier,
        }
    }
}
