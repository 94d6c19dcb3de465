// handlers/mod.rs - two security tiers
//
// Public (no token) → Protected (bearer token resolved by token_auth_middleware)
pub mod protected;
pub mod public;
