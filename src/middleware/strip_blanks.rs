use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request, State},
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

/// Remove empty-string entries from a JSON object and from every object
/// nested directly inside it.
///
/// `{ "game": { "title": "", "text": "foo" } }` becomes `{ "game": { "text": "foo" } }`.
/// Deeper levels, arrays and non-object roots are left alone.
pub fn strip_blank_fields(body: &mut Value) {
    if let Value::Object(map) = body {
        map.retain(|_, v| !is_blank(v));
        for value in map.values_mut() {
            if let Value::Object(nested) = value {
                nested.retain(|_, v| !is_blank(v));
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Middleware applying `strip_blank_fields` to JSON request bodies.
/// Bodies that do not parse as JSON are forwarded untouched.
pub async fn strip_blank_fields_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    // Buffered through the extractor so the router's DefaultBodyLimit applies
    let bytes = Bytes::from_request(Request::from_parts(parts.clone(), body), &state)
        .await
        .map_err(ApiError::from)?;

    let bytes = match serde_json::from_slice::<Value>(&bytes) {
        Ok(mut value) => {
            strip_blank_fields(&mut value);
            // The rewritten body is shorter than the declared one
            parts.headers.remove(CONTENT_LENGTH);
            Bytes::from(serde_json::to_vec(&value).map_err(|e| {
                tracing::error!("Failed to re-encode request body: {}", e);
                ApiError::internal_server_error("Failed to process request body")
            })?)
        }
        Err(_) => bytes,
    };

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
