//! DevHub backend: table-scoped CRUD over HTTP/JSON plus a per-chat push
//! stream, backed by SQLite.

use std::path::Path;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;

use services::realtime::ChannelRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Database,
    pub config: config::Config,
    pub channels: ChannelRegistry,
}

impl AppState {
    pub fn new(db: db::Database, config: config::Config) -> Self {
        Self {
            db,
            config,
            channels: ChannelRegistry::new(),
        }
    }
}

/// Builds the full application: `/api` routes, `/health`, and the SPA
/// assets from `config.static_dir` with an `index.html` fallback.
pub fn app(state: AppState) -> Router {
    let admin_routes = routes::admin::router().route_layer(axum_middleware::from_fn(
        middleware::auth::admin_middleware,
    ));

    // Build protected routes (require authentication)
    let protected_routes = Router::new()
        .nest("/profile", routes::profiles::router())
        .nest("/profiles", routes::profiles::directory_router())
        .nest("/categories", routes::projects::categories_router())
        .nest("/projects", routes::projects::router())
        .nest("/comments", routes::comments::router())
        .nest("/chats", routes::chats::router())
        .nest("/notifications", routes::notifications::router())
        .nest("/admin", admin_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    let api_router = Router::new()
        .nest("/auth", routes::auth::router())
        .merge(protected_routes);

    let static_dir = Path::new(&state.config.static_dir);
    let spa = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router)
        .fallback_service(spa)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
