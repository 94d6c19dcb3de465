use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::{Game, GameChanges, GameContent, NewGame, NewUser, User};
use crate::database::repository::{GameRepository, StoreError, UserRepository};

const GAME_COLUMNS: &str = "id, owner, content, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, hashed_password, token, created_at, updated_at";

/// PostgreSQL backed store. Game content lives in a JSONB column.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GameRow {
    id: Uuid,
    owner: Uuid,
    content: Json<GameContent>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game {
            id: row.id,
            owner: row.owner,
            content: row.content.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl GameRepository for PgStore {
    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        let sql = format!("SELECT {} FROM games ORDER BY created_at, id", GAME_COLUMNS);
        let rows = sqlx::query_as::<_, GameRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Game::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, StoreError> {
        let sql = format!("SELECT {} FROM games WHERE id = $1", GAME_COLUMNS);
        let row = sqlx::query_as::<_, GameRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Game::from))
    }

    async fn create(&self, game: NewGame) -> Result<Game, StoreError> {
        let game = game.into_game(Utc::now());
        let sql = format!(
            "INSERT INTO games ({}) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            GAME_COLUMNS, GAME_COLUMNS
        );
        let row = sqlx::query_as::<_, GameRow>(&sql)
            .bind(game.id)
            .bind(game.owner)
            .bind(Json(&game.content))
            .bind(game.created_at)
            .bind(game.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: GameChanges) -> Result<bool, StoreError> {
        // jsonb || jsonb is a shallow merge, matching Game::apply
        let result = sqlx::query(
            "UPDATE games SET content = content || $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(Json(&changes.content))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let user = user.into_user(Utc::now());
        let sql = format!(
            "INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            USER_COLUMNS, USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(&user.token)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::Conflict(format!("Email '{}' has already been taken", user.email))
                }
                other => StoreError::Sqlx(other),
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE token = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn set_token(&self, id: Uuid, token: Option<&str>) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET token = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(token)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET hashed_password = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(hashed_password)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
