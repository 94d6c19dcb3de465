use axum::extract::{Extension, State};

use crate::api::{ChangePasswordRequest, ValidJson};
use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /sign-out - revoke the token used for this request
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<()> {
    state.users.set_token(user.id, None).await?;
    tracing::info!("User {} signed out", user.id);
    Ok(ApiResponse::no_content())
}

/// PATCH /change-password - replace the password after checking the old one
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(request): ValidJson<ChangePasswordRequest>,
) -> ApiResult<()> {
    let passwords = request.passwords;

    let stored = state
        .users
        .find_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    if !verify_password(&passwords.old, &stored.hashed_password) {
        return Err(ApiError::invalid_field("old", "Does not match current password"));
    }

    let min_length = state.config.security.min_password_length.max(1);
    if passwords.new.len() < min_length {
        return Err(ApiError::invalid_field(
            "new",
            format!("Must be at least {} character(s)", min_length),
        ));
    }

    let hashed = hash_password(&passwords.new, state.config.security.password_cost)?;
    state.users.set_password(user.id, &hashed).await?;

    tracing::info!("User {} changed password", user.id);
    Ok(ApiResponse::no_content())
}
