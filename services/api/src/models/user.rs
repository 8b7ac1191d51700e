//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{blank_id, present},
};

/// User entity as persisted
///
/// The password is only ever held as an Argon2 PHC string and is never
/// serialized; callers get a [`UserResponse`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}

/// Request for user creation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Validated user creation input
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub roles: Vec<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> ApiResult<CreateUser> {
        match (
            present(self.username),
            present(self.password),
            non_empty(self.roles),
        ) {
            (Some(username), Some(password), Some(roles)) => Ok(CreateUser {
                username,
                password,
                roles,
            }),
            _ => Err(ApiError::all_fields_required()),
        }
    }
}

/// Request for user update
///
/// `id` may come from the body or from the path; `password` is optional and
/// only rehashed when supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "blank_id")]
    pub id: Option<Uuid>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
    pub active: Option<bool>,
}

/// Validated user update input
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub id: Uuid,
    pub username: String,
    pub password: Option<String>,
    pub roles: Vec<String>,
    pub active: bool,
}

impl UpdateUserRequest {
    pub fn validate(self) -> ApiResult<UpdateUser> {
        match (
            self.id,
            present(self.username),
            non_empty(self.roles),
            self.active,
        ) {
            (Some(id), Some(username), Some(roles), Some(active)) => Ok(UpdateUser {
                id,
                username,
                password: present(self.password),
                roles,
                active,
            }),
            _ => Err(ApiError::all_fields_required()),
        }
    }
}

/// Request for user deletion
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(default, deserialize_with = "blank_id")]
    pub id: Option<Uuid>,
}

/// User as returned to callers, without the password
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for user listing
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub count: usize,
    pub users: Vec<UserResponse>,
}

fn non_empty(roles: Option<Vec<String>>) -> Option<Vec<String>> {
    roles.filter(|r| !r.is_empty())
}
