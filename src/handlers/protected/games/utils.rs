use thiserror::Error;
use uuid::Uuid;

use crate::config::OwnershipFailure;
use crate::database::models::Game;
use crate::error::ApiError;
use crate::state::AppState;

/// Why a requester may not act on a game
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Game not found")]
    NotFound,

    #[error("You do not own this game")]
    NotOwner,
}

impl AccessError {
    pub fn into_api_error(self, failure: OwnershipFailure) -> ApiError {
        match (self, failure) {
            (AccessError::NotFound, _) => ApiError::not_found(AccessError::NotFound.to_string()),
            (AccessError::NotOwner, OwnershipFailure::Forbidden) => {
                ApiError::forbidden(AccessError::NotOwner.to_string())
            }
            (AccessError::NotOwner, OwnershipFailure::Unauthorized) => {
                ApiError::unauthorized(AccessError::NotOwner.to_string())
            }
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        err.into_api_error(OwnershipFailure::Forbidden)
    }
}

/// Pass a looked-up record through, or fail with NotFound
pub fn require_existence<T>(record: Option<T>) -> Result<T, AccessError> {
    record.ok_or(AccessError::NotFound)
}

/// Fail with NotOwner unless `requester` owns `game`
pub fn require_ownership(requester: Uuid, game: &Game) -> Result<(), AccessError> {
    if game.is_owned_by(requester) {
        Ok(())
    } else {
        Err(AccessError::NotOwner)
    }
}

/// Ids that are not UUIDs cannot name a stored game
pub fn parse_game_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::from(AccessError::NotFound))
}

/// Fetch a game the requester owns. Existence is checked before ownership.
pub async fn fetch_owned_game(state: &AppState, requester: Uuid, id: Uuid) -> Result<Game, ApiError> {
    let failure = state.config.security.ownership_failure;
    let found = state.games.find_by_id(id).await?;
    let game = require_existence(found).map_err(|e| e.into_api_error(failure))?;

    if let Err(e) = require_ownership(requester, &game) {
        tracing::warn!("User {} denied access to game {} owned by {}", requester, id, game.owner);
        return Err(e.into_api_error(failure));
    }

    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewGame;
    use axum::http::StatusCode;

    fn game_owned_by(owner: Uuid) -> Game {
        NewGame { owner, content: Default::default() }.into_game(chrono::Utc::now())
    }

    #[test]
    fn existence_passes_record_through() {
        assert_eq!(require_existence(Some(7)), Ok(7));
        assert_eq!(require_existence::<i32>(None), Err(AccessError::NotFound));
    }

    #[test]
    fn ownership_is_an_equality_check() {
        let owner = Uuid::new_v4();
        let game = game_owned_by(owner);
        assert_eq!(require_ownership(owner, &game), Ok(()));
        assert_eq!(require_ownership(Uuid::new_v4(), &game), Err(AccessError::NotOwner));
    }

    #[test]
    fn not_owner_status_follows_configuration() {
        assert_eq!(
            AccessError::NotOwner.into_api_error(OwnershipFailure::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AccessError::NotOwner.into_api_error(OwnershipFailure::Unauthorized).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccessError::NotFound.into_api_error(OwnershipFailure::Unauthorized).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn malformed_ids_are_not_found() {
        let err = parse_game_id("5a7db6c74d55bc51bdf39793").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(parse_game_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[tokio::test]
    async fn missing_game_is_not_found_even_for_strangers() {
        let state = AppState::in_memory(crate::config::AppConfig::for_tests());
        let err = fetch_owned_game(&state, Uuid::new_v4(), Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stranger_is_forbidden_owner_is_allowed() {
        let state = AppState::in_memory(crate::config::AppConfig::for_tests());
        let owner = Uuid::new_v4();
        let game = state
            .games
            .create(NewGame { owner, content: Default::default() })
            .await
            .unwrap();

        let err = fetch_owned_game(&state, Uuid::new_v4(), game.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let fetched = fetch_owned_game(&state, owner, game.id).await.unwrap();
        assert_eq!(fetched.id, game.id);
    }
}
