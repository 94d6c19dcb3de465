pub mod collection;
pub mod record;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::create as games_post;
pub use collection::list as games_get;

pub use record::delete as game_delete;
pub use record::get as game_get;
pub use record::patch as game_patch;
