//! API service routes
//!
//! Handlers only translate between HTTP and the services; all validation
//! and integrity checks happen in [`crate::services`].

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    error::ApiError,
    extract::{JsonBody, parse_id},
    middleware::auth_middleware,
    models::{
        note::{CreateNoteRequest, UpdateNoteRequest},
        user::{CreateUserRequest, DeleteUserRequest, UpdateUserRequest},
    },
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/users",
            get(list_users)
                .post(create_user)
                .patch(update_user_from_body)
                .delete(delete_user_from_body),
        )
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/:id",
            get(get_note).patch(update_note).delete(delete_note),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "technotes-api"
    }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.user_service.list().await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.user_service.get(id).await?))
}

/// Update with the id carried in the body
pub async fn update_user_from_body(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.user_service.update(payload).await?))
}

/// Update with the id carried in the path; it takes precedence over the body
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let payload = UpdateUserRequest {
        id: Some(id),
        ..payload
    };
    Ok(Json(state.user_service.update(payload).await?))
}

pub async fn delete_user_from_body(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<DeleteUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.user_service.delete(payload).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let reply = state
        .user_service
        .delete(DeleteUserRequest { id: Some(id) })
        .await?;
    Ok(Json(reply))
}

pub async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.note_service.list().await?))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.note_service.get(id).await?))
}

pub async fn create_note(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reply = state.note_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.note_service.update(id, payload).await?))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.note_service.delete(id).await?))
}
