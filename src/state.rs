use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::database::{GameRepository, MemoryStore, PgStore, UserRepository};

/// Shared handler context. Built once at startup and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub games: Arc<dyn GameRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        games: Arc<dyn GameRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            games,
            users,
        }
    }

    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::new(config, store.clone(), store)
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }
}
