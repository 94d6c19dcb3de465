// handlers/public/mod.rs - endpoints reachable without a token
//
// Account registration, token acquisition and service status.
pub mod auth;
pub mod status;

pub use auth::{sign_in, sign_up};
pub use status::{health, root};
