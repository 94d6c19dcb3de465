pub mod game;
pub mod user;

pub use game::{strip_system_fields, Game, GameChanges, GameContent, NewGame, SYSTEM_FIELDS};
pub use user::{NewUser, User};
