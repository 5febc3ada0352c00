//! User API endpoints

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::PaginationQuery;
use crate::api::{ApiError, AppState};
use crate::models::User;
use crate::services::UserPage;

/// User routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route(
            "/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/{id}/password", put(change_password_handler))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password_old: String,
    pub password_new: String,
    pub password_confirm: String,
}

/// GET /users
async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<UserPage>, ApiError> {
    let page = state
        .user_service
        .list_users(
            query.page_number,
            query.page_size,
            query.search.as_deref(),
            query.sort.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// POST /users
async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    if payload.password != payload.password_confirm {
        return Err(ApiError::validation_error("Passwords do not match"));
    }

    let user = state
        .user_service
        .create_user(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok(Json(user))
}

/// GET /users/{id}
async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.user_service.get_user(id).await?))
}

/// PUT /users/{id}
async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .user_service
        .update_user(id, &payload.name, &payload.email)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// DELETE /users/{id}
async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.user_service.delete_user(id).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// PUT /users/{id}/password
async fn change_password_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.password_new != payload.password_confirm {
        return Err(ApiError::validation_error("Passwords do not match"));
    }

    state
        .user_service
        .change_password(id, &payload.password_old, &payload.password_new)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}
