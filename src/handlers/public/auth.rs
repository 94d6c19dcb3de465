use axum::extract::State;
use std::collections::HashMap;

use crate::api::{CredentialsRequest, UserResponse, ValidJson};
use crate::auth::{generate_token, hash_password, verify_password};
use crate::database::models::NewUser;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /sign-up - register an account
///
/// Expected Input:
/// ```json
/// { "credentials": { "email": "caleb", "password": "12345", "password_confirmation": "12345" } }
/// ```
pub async fn sign_up(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CredentialsRequest>,
) -> ApiResult<UserResponse> {
    let credentials = request.credentials;
    let email = credentials.email.trim().to_string();

    let mut field_errors = HashMap::new();
    if email.is_empty() {
        field_errors.insert("email".to_string(), "This field is required".to_string());
    }
    if credentials.password.len() < state.config.security.min_password_length.max(1) {
        field_errors.insert(
            "password".to_string(),
            format!(
                "Must be at least {} character(s)",
                state.config.security.min_password_length.max(1)
            ),
        );
    }
    if credentials.password_confirmation.as_deref() != Some(credentials.password.as_str()) {
        field_errors.insert(
            "password_confirmation".to_string(),
            "Does not match password".to_string(),
        );
    }
    if !field_errors.is_empty() {
        return Err(ApiError::unprocessable_entity("Invalid credentials", field_errors));
    }

    let hashed_password = hash_password(&credentials.password, state.config.security.password_cost)?;
    let user = state
        .users
        .create(NewUser {
            email,
            hashed_password,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.email, user.id);
    Ok(ApiResponse::created(UserResponse { user }))
}

/// POST /sign-in - exchange credentials for a fresh bearer token
pub async fn sign_in(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CredentialsRequest>,
) -> ApiResult<UserResponse> {
    let credentials = request.credentials;

    let user = state
        .users
        .find_by_email(credentials.email.trim())
        .await?
        .filter(|user| verify_password(&credentials.password, &user.hashed_password))
        .ok_or_else(|| {
            tracing::warn!("Failed sign-in for {}", credentials.email);
            ApiError::unauthorized("Invalid email or password")
        })?;

    let token = generate_token();
    state.users.set_token(user.id, Some(&token)).await?;

    tracing::info!("User {} signed in", user.id);
    let user = crate::database::models::User {
        token: Some(token),
        ..user
    };
    Ok(ApiResponse::created(UserResponse { user }))
}
