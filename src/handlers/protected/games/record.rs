use axum::extract::{Extension, Path, State};

use crate::api::{validate_game_changes, GameRequest, GameResponse, ValidJson};
use crate::database::models::GameChanges;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::utils::{fetch_owned_game, parse_game_id, require_existence, AccessError};

/// GET /games/:id - any authenticated user may read any game
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<GameResponse> {
    let id = parse_game_id(&id)?;
    let game = require_existence(state.games.find_by_id(id).await?)?;
    tracing::debug!("User {} fetched game {}", user.id, id);
    Ok(ApiResponse::success(GameResponse { game }))
}

/// PATCH /games/:id - shallow update by the owner
///
/// Runs behind the blank-field stripper, so empty strings never reach here.
/// Body errors are reported only after existence and ownership pass.
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Result<ValidJson<GameRequest>, ApiError>,
) -> ApiResult<()> {
    let id = parse_game_id(&id)?;
    fetch_owned_game(&state, user.id, id).await?;

    let ValidJson(request) = body?;
    let content = request.into_content();
    validate_game_changes(&content, &state.config.games.required_fields)?;

    let fields = content.len();
    if !state.games.update(id, GameChanges { content }).await? {
        // Deleted between the ownership check and the write
        return Err(ApiError::from(AccessError::NotFound));
    }

    tracing::info!("User {} updated {} field(s) of game {}", user.id, fields, id);
    Ok(ApiResponse::no_content())
}

/// DELETE /games/:id - removal by the owner
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_game_id(&id)?;
    fetch_owned_game(&state, user.id, id).await?;

    if !state.games.delete(id).await? {
        return Err(ApiError::from(AccessError::NotFound));
    }

    tracing::info!("User {} deleted game {}", user.id, id);
    Ok(ApiResponse::no_content())
}
