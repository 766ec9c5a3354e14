//! DreamTales web server.
//!
//! JSON API in front of [`dreamtales_story::StoryService`], plus static file
//! serving for the frontend.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::ApiError;
pub use state::AppState;

async fn health() -> &'static str {
    "OK"
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let api_routes = Router::new()
        .route(
            "/api/stories",
            get(handlers::list_stories).post(handlers::create_story),
        )
        .route("/api/stories/{id}", get(handlers::get_story))
        .route("/api/moderate", post(handlers::moderate))
        .route("/api/word-target/{length}", get(handlers::word_target));

    Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}
