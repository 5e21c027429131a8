//! Login handler.
//!
//! A plain credential check against the single operator account: name or
//! email (case-insensitive) plus a bcrypt-verified password. No sessions or
//! tokens; the UI keeps its own "logged in" flag, as the legacy app did.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "username and password are required".to_string(),
        ));
    }

    let user = state
        .db
        .users()
        .find_by_login(&request.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let matches = bcrypt::verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    info!(user = %user.name, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
    }))
}
