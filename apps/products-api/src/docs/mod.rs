//! Swagger document serving: `/swagger.json` plus the Swagger UI at `/docs/`.

pub mod loader;
pub mod watcher;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use axum_helpers::swagger_ui_router;

pub use loader::{DocSource, LoadError, SwaggerLoader};
pub use watcher::{spawn_watcher, WatchError, WatchSettings};

pub const SPEC_URL: &str = "/swagger.json";
pub const UI_PATH: &str = "/docs";

async fn swagger_json(State(loader): State<SwaggerLoader>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        loader.document().await,
    )
}

/// Routes serving the current document and the UI that renders it.
pub fn router(loader: SwaggerLoader) -> Router {
    Router::new()
        .route(SPEC_URL, get(swagger_json))
        .with_state(loader)
        .merge(swagger_ui_router(UI_PATH, SPEC_URL))
}
