//! Auth API endpoints

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::api::{ApiError, AppState};
use crate::services::LoginOutcome;

/// Auth routes
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login_handler))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginOutcome>, ApiError> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation_error("email and password are required"));
    }

    let outcome = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(outcome))
}
