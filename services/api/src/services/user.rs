//! User lifecycle: creation, update, listing and guarded deletion

use std::{collections::HashMap, sync::Arc};

use common::error::DatabaseError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        MessageResponse,
        user::{
            CreateUserRequest, DeleteUserRequest, NewUser, UpdateUserRequest, User,
            UserListResponse, UserResponse,
        },
    },
    password::PasswordHasher,
    services::EMPTY_LIST_IS_NOT_FOUND,
    store::{NoteStore, UserStore},
};

const USERNAME_TAKEN: &str = "Username already exists";
const USER_NOT_FOUND: &str = "User not found";
const USER_HAS_NOTES: &str = "User has assigned notes";

/// Service owning the user invariants
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    notes: Arc<dyn NoteStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserStore>,
        notes: Arc<dyn NoteStore>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            notes,
            hasher,
        }
    }

    /// All users, without passwords
    pub async fn list(&self) -> ApiResult<UserListResponse> {
        let users = self.users.find_all().await?;
        if users.is_empty() && EMPTY_LIST_IS_NOT_FOUND {
            return Err(ApiError::NotFound("No users found".to_string()));
        }

        let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
        Ok(UserListResponse {
            count: users.len(),
            users,
        })
    }

    /// A single user, without password
    pub async fn get(&self, id: Uuid) -> ApiResult<UserResponse> {
        self.find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn find_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        Ok(self.users.find_by_id(id).await?)
    }

    /// Resolve usernames for a batch of ids; unknown ids are left out
    pub async fn usernames(&self, ids: &[Uuid]) -> ApiResult<HashMap<Uuid, String>> {
        let users = self.users.find_by_ids(ids).await?;
        Ok(users.into_iter().map(|u| (u.id, u.username)).collect())
    }

    pub async fn create(&self, request: CreateUserRequest) -> ApiResult<MessageResponse> {
        let input = request.validate()?;
        info!("Creating new user: {}", input.username);

        if self.users.find_by_username(&input.username).await?.is_some() {
            warn!("Rejected duplicate username: {}", input.username);
            return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let password_hash = self.hash_password(input.password).await?;
        let user = self
            .users
            .insert(NewUser {
                username: input.username,
                password_hash,
                roles: input.roles,
            })
            .await
            .map_err(username_conflict)?;

        info!("Created user {} ({})", user.username, user.id);
        Ok(MessageResponse::new(format!(
            "New user {} created",
            user.username
        )))
    }

    pub async fn update(&self, request: UpdateUserRequest) -> ApiResult<MessageResponse> {
        let input = request.validate()?;
        info!("Updating user: {}", input.id);

        let mut user = self
            .users
            .find_by_id(input.id)
            .await?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

        if let Some(duplicate) = self.users.find_by_username(&input.username).await? {
            if duplicate.id != user.id {
                warn!("Rejected rename of {} to taken username {}", user.id, input.username);
                return Err(ApiError::Conflict(USERNAME_TAKEN.to_string()));
            }
        }

        user.username = input.username;
        user.roles = input.roles;
        user.active = input.active;
        if let Some(password) = input.password {
            user.password_hash = self.hash_password(password).await?;
        }

        let updated = self
            .users
            .save(&user)
            .await
            .map_err(username_conflict)?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;
        Ok(MessageResponse::new(format!("{} updated", updated.username)))
    }

    pub async fn delete(&self, request: DeleteUserRequest) -> ApiResult<MessageResponse> {
        let id = request
            .id
            .ok_or_else(|| ApiError::BadRequest("User ID Required".to_string()))?;

        // Checked before the user lookup: an owned note makes deletion impossible either way
        if self.notes.find_one_by_user(id).await?.is_some() {
            warn!("Refusing to delete user {} with assigned notes", id);
            return Err(ApiError::BadRequest(USER_HAS_NOTES.to_string()));
        }

        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

        let deleted = self.users.delete(id).await.map_err(|e| match e {
            DatabaseError::ForeignKeyViolation(_) => {
                ApiError::BadRequest(USER_HAS_NOTES.to_string())
            }
            other => other.into(),
        })?;
        if !deleted {
            return Err(ApiError::NotFound(USER_NOT_FOUND.to_string()));
        }

        info!("Deleted user {} ({})", user.username, user.id);
        Ok(MessageResponse::new(format!(
            "User {} with ID {} deleted",
            user.username, user.id
        )))
    }

    async fn hash_password(&self, password: String) -> ApiResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ApiError::InternalServerError(e.to_string()))?
            .map_err(|e| ApiError::InternalServerError(e.to_string()))
    }
}

fn username_conflict(err: DatabaseError) -> ApiError {
    match err {
        DatabaseError::UniqueViolation(_) => ApiError::Conflict(USERNAME_TAKEN.to_string()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::note::NewNote,
        repositories::MemoryStore,
        services::testing::{ScriptedStore, services, services_over},
    };
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    fn create_request(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
            roles: Some(vec!["Employee".to_string()]),
        }
    }

    fn update_request(user: &User, username: &str, password: Option<&str>) -> UpdateUserRequest {
        UpdateUserRequest {
            id: Some(user.id),
            username: Some(username.to_string()),
            password: password.map(str::to_string),
            roles: Some(vec!["Manager".to_string()]),
            active: Some(true),
        }
    }

    async fn stored(store: &MemoryStore, username: &str) -> User {
        UserStore::find_by_username(store, username)
            .await
            .unwrap()
            .expect("user stored")
    }

    fn verifies(hash: &str, password: &str) -> bool {
        let parsed = PasswordHash::new(hash).unwrap();
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    #[tokio::test]
    async fn test_create_then_list_hides_password() {
        let (store, users, _) = services();

        let reply = users.create(create_request("alice", "secret1")).await.unwrap();
        assert_eq!(reply.message, "New user alice created");

        let listed = users.list().await.unwrap();
        assert_eq!(listed.count, 1);
        assert_eq!(listed.users[0].username, "alice");
        assert_eq!(listed.users[0].roles, vec!["Employee".to_string()]);
        assert!(listed.users[0].active);

        let json = serde_json::to_string(&listed.users).unwrap();
        assert!(!json.contains("password"));

        let alice = stored(&store, "alice").await;
        assert_ne!(alice.password_hash, "secret1");
        assert!(verifies(&alice.password_hash, "secret1"));
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_found() {
        let (_, users, _) = services();
        let err = users.list().await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "No users found"));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let (_, users, _) = services();
        users.create(create_request("alice", "secret1")).await.unwrap();

        let err = users.create(create_request("alice", "x")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg == "Username already exists"));

        // Case-sensitive exact match
        users.create(create_request("ALICE", "x")).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_requires_all_fields() {
        let (_, users, _) = services();
        let request = CreateUserRequest {
            roles: Some(vec![]),
            ..create_request("alice", "secret1")
        };

        let err = users.create(request).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "All fields are required"));
    }

    #[tokio::test]
    async fn test_update_to_own_username_succeeds() {
        let (store, users, _) = services();
        users.create(create_request("alice", "secret1")).await.unwrap();
        let alice = stored(&store, "alice").await;

        let reply = users
            .update(update_request(&alice, "alice", None))
            .await
            .unwrap();
        assert_eq!(reply.message, "alice updated");

        let after = stored(&store, "alice").await;
        assert_eq!(after.roles, vec!["Manager".to_string()]);
        assert_eq!(after.password_hash, alice.password_hash);
    }

    #[tokio::test]
    async fn test_update_to_taken_username_conflicts() {
        let (store, users, _) = services();
        users.create(create_request("alice", "secret1")).await.unwrap();
        users.create(create_request("bob", "secret2")).await.unwrap();
        let bob = stored(&store, "bob").await;

        let err = users
            .update(update_request(&bob, "alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_rehashes_supplied_password() {
        let (store, users, _) = services();
        users.create(create_request("alice", "secret1")).await.unwrap();
        let alice = stored(&store, "alice").await;

        users
            .update(update_request(&alice, "alice", Some("secret2")))
            .await
            .unwrap();

        let after = stored(&store, "alice").await;
        assert!(verifies(&after.password_hash, "secret2"));
        assert!(!verifies(&after.password_hash, "secret1"));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let (_, users, _) = services();
        let request = UpdateUserRequest {
            id: Some(Uuid::new_v4()),
            username: Some("ghost".into()),
            password: None,
            roles: Some(vec!["Employee".into()]),
            active: Some(true),
        };

        let err = users.update(request).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_guarded_by_assigned_notes() {
        let (store, users, _) = services();
        users.create(create_request("alice", "secret1")).await.unwrap();
        let alice = stored(&store, "alice").await;
        let note = NoteStore::insert(
            &store,
            NewNote {
                user_id: alice.id,
                title: "T1".into(),
                text: "body".into(),
            },
        )
        .await
        .unwrap();

        let err = users
            .delete(DeleteUserRequest { id: Some(alice.id) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "User has assigned notes"));
        assert!(UserStore::find_by_id(&store, alice.id).await.unwrap().is_some());
        assert!(NoteStore::find_by_id(&store, note.id).await.unwrap().is_some());

        NoteStore::delete(&store, note.id).await.unwrap();
        let reply = users
            .delete(DeleteUserRequest { id: Some(alice.id) })
            .await
            .unwrap();
        assert_eq!(
            reply.message,
            format!("User alice with ID {} deleted", alice.id)
        );
    }

    #[tokio::test]
    async fn test_delete_requires_existing_id() {
        let (_, users, _) = services();

        let err = users.delete(DeleteUserRequest { id: None }).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "User ID Required"));

        let err = users
            .delete(DeleteUserRequest {
                id: Some(Uuid::new_v4()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    fn blind_store() -> ScriptedStore {
        ScriptedStore {
            hide_conflicts: true,
            ..ScriptedStore::default()
        }
    }

    #[tokio::test]
    async fn test_store_unique_index_reports_username_conflict_on_create() {
        let store = blind_store();
        let (users, _) = services_over(Arc::new(store.clone()));
        users.create(create_request("alice", "secret1")).await.unwrap();

        let err = users.create(create_request("alice", "x")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg == "Username already exists"));
        assert_eq!(UserStore::find_all(&store.inner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_unique_index_reports_username_conflict_on_update() {
        let store = blind_store();
        let (users, _) = services_over(Arc::new(store.clone()));
        users.create(create_request("alice", "secret1")).await.unwrap();
        users.create(create_request("bob", "secret2")).await.unwrap();
        let bob = stored(&store.inner, "bob").await;

        let err = users
            .update(update_request(&bob, "alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(msg) if msg == "Username already exists"));
        assert_eq!(stored(&store.inner, "bob").await.roles, bob.roles);
    }

    #[tokio::test]
    async fn test_store_foreign_key_reports_assigned_notes_on_delete() {
        let store = blind_store();
        let (users, _) = services_over(Arc::new(store.clone()));
        users.create(create_request("alice", "secret1")).await.unwrap();
        let alice = stored(&store.inner, "alice").await;
        NoteStore::insert(
            &store.inner,
            NewNote {
                user_id: alice.id,
                title: "T1".into(),
                text: "body".into(),
            },
        )
        .await
        .unwrap();

        let err = users
            .delete(DeleteUserRequest { id: Some(alice.id) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "User has assigned notes"));
        assert!(UserStore::find_by_id(&store.inner, alice.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_of_concurrently_deleted_user_is_not_found() {
        let store = ScriptedStore {
            lose_rows: true,
            ..ScriptedStore::default()
        };
        let (users, _) = services_over(Arc::new(store.clone()));
        users.create(create_request("alice", "secret1")).await.unwrap();
        let alice = stored(&store.inner, "alice").await;

        let err = users
            .update(update_request(&alice, "alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "User not found"));
    }
}
