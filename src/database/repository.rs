use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Game, GameChanges, NewGame, NewUser, User};

/// Errors raised by the storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Data access for game documents
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Every game, oldest first
    async fn list(&self) -> Result<Vec<Game>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, StoreError>;

    async fn create(&self, game: NewGame) -> Result<Game, StoreError>;

    /// Merge `changes` into the stored content. Returns false when no game has this id.
    async fn update(&self, id: Uuid, changes: GameChanges) -> Result<bool, StoreError>;

    /// Returns false when no game has this id
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Liveness check for `/health`
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Data access for accounts and their bearer tokens
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `StoreError::Conflict` when the email is taken
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Replace (or with `None`, revoke) the user's bearer token
    async fn set_token(&self, id: Uuid, token: Option<&str>) -> Result<(), StoreError>;

    async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<(), StoreError>;
}
