pub mod extract;
pub mod payload;

pub use extract::ValidJson;
pub use payload::{
    validate_game_changes, validate_new_game, ChangePasswordRequest, CredentialsRequest,
    GameRequest, GameResponse, GamesResponse, UserResponse,
};
