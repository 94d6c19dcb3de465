use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::database::models::{strip_system_fields, Game, GameContent, User};
use crate::error::ApiError;

/// `{ "game": { ... } }` body of POST and PATCH /games
#[derive(Debug, Deserialize)]
pub struct GameRequest {
    pub game: GameContent,
}

impl GameRequest {
    /// Client content with `owner` and other server-managed keys removed
    pub fn into_content(self) -> GameContent {
        let mut content = self.game;
        strip_system_fields(&mut content);
        content
    }
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub game: Game,
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub games: Vec<Game>,
}

/// A new game must carry every required field with a usable value
pub fn validate_new_game(content: &GameContent, required: &[String]) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();
    for field in required {
        match content.get(field) {
            None | Some(Value::Null) => {
                field_errors.insert(field.clone(), "This field is required".to_string());
            }
            Some(Value::String(s)) if s.is_empty() => {
                field_errors.insert(field.clone(), "This field is required".to_string());
            }
            Some(_) => {}
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Missing required fields", field_errors))
    }
}

/// A patch may omit required fields but may not clear them
pub fn validate_game_changes(content: &GameContent, required: &[String]) -> Result<(), ApiError> {
    let field_errors: HashMap<String, String> = required
        .iter()
        .filter(|field| matches!(content.get(field.as_str()), Some(Value::Null)))
        .map(|field| (field.clone(), "This field cannot be cleared".to_string()))
        .collect();

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entity("Invalid update", field_errors))
    }
}

/// `{ "credentials": { ... } }` body of POST /sign-up and /sign-in
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub credentials: Credentials,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

/// `{ "passwords": { "old": ..., "new": ... } }` body of PATCH /change-password
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub passwords: PasswordChange,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}
