// handlers/protected/mod.rs - endpoints behind token_auth_middleware
//
// Every handler here may take `Extension<AuthUser>`.
pub mod auth;
pub mod games;

pub use auth::{change_password, sign_out};
pub use games::*;
