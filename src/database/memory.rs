use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Game, GameChanges, NewGame, NewUser, User};
use crate::database::repository::{GameRepository, StoreError, UserRepository};

/// Process-local store used for tests and for running without PostgreSQL.
/// Contents are lost on shutdown.
#[derive(Default)]
pub struct MemoryStore {
    games: RwLock<HashMap<Uuid, Game>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Game>, StoreError> {
        let games = self.games.read().await;
        let mut all: Vec<Game> = games.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Game>, StoreError> {
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn create(&self, game: NewGame) -> Result<Game, StoreError> {
        let game = game.into_game(Utc::now());
        self.games.write().await.insert(game.id, game.clone());
        Ok(game)
    }

    async fn update(&self, id: Uuid, changes: GameChanges) -> Result<bool, StoreError> {
        let mut games = self.games.write().await;
        match games.get_mut(&id) {
            Some(game) => {
                game.apply(&changes, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.games.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!(
                "Email '{}' has already been taken",
                user.email
            )));
        }
        let user = user.into_user(Utc::now());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn set_token(&self, id: Uuid, token: Option<&str>) -> Result<(), StoreError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.token = token.map(str::to_string);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_password(&self, id: Uuid, hashed_password: &str) -> Result<(), StoreError> {
        if let Some(user) = self.users.write().await.get_mut(&id) {
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::GameContent;
    use serde_json::{json, Map, Value};

    fn content(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            hashed_password: "salt$digest".to_string(),
        }
    }

    #[tokio::test]
    async fn game_lifecycle() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();

        let game = GameRepository::create(
            &store,
            NewGame { owner, content: content(json!({ "title": "Zork", "text": "West" })) },
        )
        .await
        .unwrap();

        let found = GameRepository::find_by_id(&store, game.id).await.unwrap().unwrap();
        assert_eq!(found, game);

        let changed = store
            .update(game.id, GameChanges { content: content(json!({ "text": "East" })) })
            .await
            .unwrap();
        assert!(changed);
        let found = GameRepository::find_by_id(&store, game.id).await.unwrap().unwrap();
        assert_eq!(found.content["title"], "Zork");
        assert_eq!(found.content["text"], "East");
        assert_eq!(found.owner, owner);

        assert!(store.delete(game.id).await.unwrap());
        assert!(!store.delete(game.id).await.unwrap());
        assert!(GameRepository::find_by_id(&store, game.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_of_missing_game_reports_false() {
        let store = MemoryStore::new();
        let changed = store.update(Uuid::new_v4(), GameChanges::default()).await.unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn list_is_oldest_first() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let base = Utc::now();

        // Inserted out of order; creation time decides the listing
        for (title, offset) in [("second", 1), ("third", 2), ("first", 0)] {
            let game = NewGame { owner, content: content(json!({ "title": title })) }
                .into_game(base + chrono::Duration::seconds(offset));
            store.games.write().await.insert(game.id, game);
        }

        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.content["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn list_breaks_timestamp_ties_by_id() {
        let store = MemoryStore::new();
        let at = Utc::now();
        for _ in 0..4 {
            let game = NewGame { owner: Uuid::new_v4(), content: GameContent::new() }.into_game(at);
            store.games.write().await.insert(game.id, game);
        }

        let ids: Vec<Uuid> = store.list().await.unwrap().into_iter().map(|g| g.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserRepository::create(&store, new_user("caleb")).await.unwrap();
        let err = UserRepository::create(&store, new_user("caleb")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn token_lookup_follows_set_token() {
        let store = MemoryStore::new();
        let user = UserRepository::create(&store, new_user("caleb")).await.unwrap();

        assert!(store.find_by_token("abc").await.unwrap().is_none());

        store.set_token(user.id, Some("abc")).await.unwrap();
        let found = store.find_by_token("abc").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        store.set_token(user.id, None).await.unwrap();
        assert!(store.find_by_token("abc").await.unwrap().is_none());
    }
}
