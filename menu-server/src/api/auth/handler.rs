//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Fixed delay applied to every login attempt
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub email: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&req.email, "email", MAX_EMAIL_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let staff = state.staff.clone();
    let email = req.email.clone();
    let valid = tokio::task::spawn_blocking(move || staff.verify(&email, &req.password))
        .await
        .map_err(|e| AppError::internal(format!("Password check failed: {e}")))?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if !valid {
        security_log!("WARN", "login_failed", email = req.email.clone());
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&state.staff.email)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!("INFO", "login_success", email = state.staff.email.clone());

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt_service.expires_in(),
        email: state.staff.email.clone(),
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
    Json(user)
}
