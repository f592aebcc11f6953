use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, StatusCode},
    middleware::{from_fn_with_state, map_response},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router with global middleware
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .merge(public_routes())
        // Protected API (bearer auth)
        .merge(project_routes(state.clone()))
        .merge(chat_routes(state.clone()))
        .fallback(route_not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(map_response(json_payload_too_large));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn public_routes() -> Router<AppState> {
    use public::{health, users};

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        // Identity-provider webhook and user listing
        .route("/create-user", post(users::create_user))
        .route("/get-users", get(users::list_users))
}

fn project_routes(state: AppState) -> Router<AppState> {
    use protected::{files, projects};

    Router::new()
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/:project_id",
            get(projects::get).delete(projects::delete),
        )
        .route("/api/projects/:project_id/chats", get(projects::chats))
        .route("/api/projects/:project_id/settings", get(projects::settings))
        .route("/api/projects/:project_id/files", get(files::list))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn chat_routes(state: AppState) -> Router<AppState> {
    use protected::chats;

    Router::new()
        .route("/api/chats", post(chats::create))
        .route("/api/chats/:chat_id", delete(chats::delete))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// `RequestBodyLimitLayer` answers an oversized Content-Length with a
/// plain-text 413; rewrite it into the error envelope.
async fn json_payload_too_large(response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }
    ApiError::payload_too_large("Request body exceeds the configured size limit").into_response()
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|origin| {
            // Credentialed CORS cannot use a wildcard origin
            if origin.as_str() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
                return false;
            }
            true
        })
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
