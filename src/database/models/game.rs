use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Free-form content of a game document
pub type GameContent = Map<String, Value>;

/// Keys owned by the server. Clients can never store them as content.
pub const SYSTEM_FIELDS: &[&str] = &["id", "_id", "owner", "createdAt", "updatedAt"];

/// A persisted game document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: Uuid,
    pub owner: Uuid,
    #[serde(flatten)]
    pub content: GameContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    /// Shallow merge: every key in `changes` replaces the stored key
    pub fn apply(&mut self, changes: &GameChanges, at: DateTime<Utc>) {
        for (key, value) in &changes.content {
            self.content.insert(key.clone(), value.clone());
        }
        self.updated_at = at;
    }
}

/// A game about to be inserted. The owner always comes from the requester.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub owner: Uuid,
    pub content: GameContent,
}

impl NewGame {
    pub fn into_game(self, at: DateTime<Utc>) -> Game {
        Game {
            id: Uuid::new_v4(),
            owner: self.owner,
            content: self.content,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Partial update of a game's content
#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub content: GameContent,
}

/// Drop server-managed keys from client supplied content
pub fn strip_system_fields(content: &mut GameContent) {
    for key in SYSTEM_FIELDS {
        content.remove(*key);
    }
}
