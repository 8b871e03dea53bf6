use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use cinelog_core::api_types::ApiResponse;
use cinelog_model::{
    AuthToken, ChangePasswordRequest, LoginRequest, RegisterRequest, User, UserRole,
};
use uuid::Uuid;

use super::jwt::{ACCESS_TOKEN_TTL_SECS, generate_access_token};
use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

const DEFAULT_THEME: &str = "light";

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<AuthToken>>> {
    request.validate()?;

    let password_hash = hash_password(&request.password)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: request.email.to_lowercase(),
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        role: UserRole::User,
        theme: request.theme.clone().unwrap_or_else(|| DEFAULT_THEME.to_string()),
        avatar_url: None,
        created_at: now,
        updated_at: now,
    };

    state
        .unit_of_work
        .users
        .create_user_with_password(&user, &password_hash)
        .await?;

    let access_token = generate_access_token(user.id, &state.config.jwt_secret)
        .map_err(|_| AppError::internal("Failed to generate access token"))?;

    Ok(Json(ApiResponse::success(AuthToken {
        access_token,
        expires_in: ACCESS_TOKEN_TTL_SECS,
    })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthToken>>> {
    let user = state
        .unit_of_work
        .users
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    let password_hash = state
        .unit_of_work
        .users
        .get_password_hash(user.id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

    verify_password(&request.password, &password_hash)
        .map_err(|_| AppError::unauthorized("Invalid email or password"))?;

    let access_token = generate_access_token(user.id, &state.config.jwt_secret)
        .map_err(|_| AppError::internal("Failed to generate access token"))?;

    Ok(Json(ApiResponse::success(AuthToken {
        access_token,
        expires_in: ACCESS_TOKEN_TTL_SECS,
    })))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(request): Json<ChangePasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    request.validate()?;

    let password_hash = state
        .unit_of_work
        .users
        .get_password_hash(user.id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    verify_password(&request.current_password, &password_hash)
        .map_err(|_| AppError::unauthorized("Current password is incorrect"))?;

    let new_hash = hash_password(&request.new_password)?;
    state
        .unit_of_work
        .users
        .update_password(user.id, &new_hash)
        .await?;

    Ok(Json(
        ApiResponse::success(()).with_message("Password updated successfully".to_string()),
    ))
}

pub async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.unit_of_work.users.delete_user(user.id).await?;

    Ok(Json(
        ApiResponse::success(()).with_message("Account deleted successfully".to_string()),
    ))
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::internal("Failed to hash password"))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<(), argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
}
