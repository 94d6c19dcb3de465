use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::{strip_blank_fields_middleware, token_auth_middleware};
use crate::state::AppState;

/// Build the complete application router around `state`.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/sign-up", post(public::sign_up))
        .route("/sign-in", post(public::sign_in))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/games",
            get(protected::games_get).post(protected::games_post),
        )
        .route(
            "/games/:id",
            get(protected::game_get)
                .patch(protected::game_patch.layer(from_fn_with_state(
                    state.clone(),
                    strip_blank_fields_middleware,
                )))
                .delete(protected::game_delete),
        )
        .route("/sign-out", delete(protected::sign_out))
        .route("/change-password", patch(protected::change_password))
        // route_layer: unmatched paths still 404 instead of 401
        .route_layer(from_fn_with_state(state.clone(), token_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = &config.security.cors_origins;
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
