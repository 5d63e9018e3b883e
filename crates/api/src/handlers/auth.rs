//! Handlers for the `/auth` resource (register, login, logout, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chardb_core::error::CoreError;
use chardb_core::types::entity;
use chardb_db::models::user::{CreateUser, NewUser, UserProfile};
use chardb_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::token::generate_session_token;
use crate::error::{AppError, AppResult};
use crate::middleware::json::ValidJson;
use crate::middleware::session::SessionAuth;
use crate::response::MessageResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful login: the plaintext token is only ever returned here.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create an account with no roles. Returns 201 with the new user's id and username.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<NewUser>)> {
    validate_password_strength(&input.password, state.config.min_password_length)
        .map_err(AppError::BadRequest)?;

    if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(NewUser::from(&user))))
}

/// POST /auth/login
///
/// Verify credentials and open a new session. No session is created on failure.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid());
    }

    let (token, token_hash) = generate_session_token();
    SessionRepo::create(&state.pool, user.id, &token_hash).await?;

    let profile = UserRepo::find_profile(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found(entity::USER, user.id)))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Logged in successfully",
        user: profile,
        token,
    }))
}

/// POST /auth/logout
///
/// Delete the presented session. Other sessions of the same user stay valid.
pub async fn logout(
    State(state): State<AppState>,
    auth: SessionAuth,
) -> AppResult<Json<MessageResponse>> {
    let user_id = auth.session.user_id();
    SessionRepo::delete(&state.pool, user_id, &auth.session.token_hash).await?;

    tracing::info!(user_id, "User logged out");

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// POST /auth/profile
///
/// Confirm the token is valid and return the user with its roles.
pub async fn profile(auth: SessionAuth) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(ProfileResponse {
        message: "Token is valid",
        user: auth.session.user,
    }))
}
