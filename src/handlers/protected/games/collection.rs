use axum::extract::{Extension, State};

use crate::api::{validate_new_game, GameRequest, GameResponse, GamesResponse, ValidJson};
use crate::database::models::NewGame;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /games - every game, regardless of owner
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<GamesResponse> {
    let games = state.games.list().await?;
    tracing::debug!("User {} listed {} games", user.id, games.len());
    Ok(ApiResponse::success(GamesResponse { games }))
}

/// POST /games - create a game owned by the requester
///
/// Any `owner` in the body is discarded. Required fields are checked before
/// anything is written.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(request): ValidJson<GameRequest>,
) -> ApiResult<GameResponse> {
    let content = request.into_content();
    validate_new_game(&content, &state.config.games.required_fields)?;

    let game = state
        .games
        .create(NewGame {
            owner: user.id,
            content,
        })
        .await?;

    tracing::info!("User {} created game {}", user.id, game.id);
    Ok(ApiResponse::created(GameResponse { game }))
}
