use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{jwt, password},
    error::{AppError, AppResult},
    models::{NewUser, User},
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

/// Handler for POST /api/v1/auth/register
///
/// The stored `User` serializes without its password hash, so the created
/// record can be echoed back directly.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput(
            "A valid email address is required".to_string(),
        ));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Name cannot be empty".to_string()));
    }

    if state.store.user_by_email(&email).await?.is_some() {
        return Err(AppError::InvalidInput(
            "Email is already registered".to_string(),
        ));
    }

    let password_hash = password::hash_password(&request.password)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?;

    let user = state
        .store
        .insert_user(NewUser {
            email,
            password_hash,
            name: name.to_string(),
            age: request.age,
            gender: request.gender,
            preferences: request.preferences,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();

    // Same rejection whether the email is unknown or the password is
    // wrong; login must not reveal which emails exist.
    let user = state
        .store
        .user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&request.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let access_token = jwt::generate_token(user.id, &state.jwt)
        .map_err(|e| AppError::Internal(format!("Token signing failed: {e}")))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.jwt.expiry_hours * 3600,
        user,
    }))
}
