use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::parse_authorization;
use crate::database::models::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated requester resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

impl AuthUser {
    fn from_user(user: User, token: &str) -> Self {
        Self {
            id: user.id,
            email: user.email,
            token: token.to_string(),
        }
    }
}

/// Token authentication middleware: resolves the bearer token to a user and
/// injects `AuthUser` into the request. Fails with 401 otherwise.
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let user = state
        .users
        .find_by_token(token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Rejected request with unknown bearer token");
            ApiError::unauthorized("Invalid or expired token")
        })?;

    tracing::debug!("Authenticated {} ({})", user.email, user.id);

    let auth_user = AuthUser::from_user(user, token);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_token_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    parse_authorization(auth_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_header_is_reported() {
        let headers = HeaderMap::new();
        assert_eq!(
            extract_token_from_headers(&headers),
            Err("Missing Authorization header")
        );
    }

    #[test]
    fn reads_token_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token token=abc"));
        assert_eq!(extract_token_from_headers(&headers), Ok("abc"));
    }
}
