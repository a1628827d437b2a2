use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::auth::TokenVerifier;
use crate::config::SecurityConfig;
use crate::database::DocumentStore;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{GithubClient, PostService, ProfileService, UserService};

/// Shared handler state. Everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub store: Arc<dyn DocumentStore>,
    pub users: UserService,
    pub posts: PostService,
    pub profiles: ProfileService,
    pub github: GithubClient,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        verifier: TokenVerifier,
        github: GithubClient,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            users: UserService::new(store.clone()),
            posts: PostService::new(store.clone()),
            profiles: ProfileService::new(store.clone()),
            store,
            github,
        }
    }
}

/// Full HTTP surface: public routes plus credential-guarded routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(public::auth::register))
        .route("/api/auth", post(public::auth::login))
        .route("/api/profile", get(public::profile::list))
        .route("/api/profile/user/:user_id", get(public::profile::by_user))
        .route(
            "/api/profile/github/:username",
            get(public::profile::github_repos),
        )
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth", get(protected::auth::current_user))
        // Posts
        .route(
            "/api/posts",
            post(protected::posts::create).get(protected::posts::list),
        )
        .route(
            "/api/posts/:id",
            get(protected::posts::get).delete(protected::posts::delete),
        )
        .route("/api/posts/like/:id", put(protected::posts::like))
        .route("/api/posts/unlike/:id", put(protected::posts::unlike))
        .route("/api/posts/dislike/:id", put(protected::posts::unlike))
        .route("/api/posts/comment/:id", post(protected::posts::comment))
        .route(
            "/api/posts/comment/:id/:comment_id",
            delete(protected::posts::delete_comment),
        )
        // Profiles
        .route("/api/profile/me", get(protected::profile::me))
        .route(
            "/api/profile",
            post(protected::profile::upsert).delete(protected::profile::delete_account),
        )
        .route("/api/profile/experience", put(protected::profile::add_experience))
        .route(
            "/api/profile/experience/:exp_id",
            delete(protected::profile::remove_experience),
        )
        .route("/api/profile/education", put(protected::profile::add_education))
        .route(
            "/api/profile/education/:edu_id",
            delete(protected::profile::remove_education),
        )
        // Only routes registered above are guarded, unmatched paths still 404
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

/// Browser access policy. `None` when CORS is switched off.
pub fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "DevConnect API",
            "version": version,
            "description": "Developer social network backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "register": "POST /api/users (public)",
                "login": "POST /api/auth (public)",
                "profiles": "GET /api/profile[/user/:user_id|/github/:username] (public)",
                "auth": "GET /api/auth (protected)",
                "profile": "/api/profile[/me|/experience|/education] (protected)",
                "posts": "/api/posts[/:id|/like/:id|/unlike/:id|/comment/:id] (protected)",
            },
            "authentication": {
                "header": "x-auth-token",
                "alternative": "Authorization: Bearer <token>",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
