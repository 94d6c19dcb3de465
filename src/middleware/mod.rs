pub mod auth;
pub mod response;
pub mod strip_blanks;

pub use auth::{token_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use strip_blanks::{strip_blank_fields, strip_blank_fields_middleware};
