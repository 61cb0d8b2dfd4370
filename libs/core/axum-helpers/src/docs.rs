//! Swagger UI mounting for documents served from a URL.

use axum::Router;
use utoipa_swagger_ui::{Config, SwaggerUi};

/// Swagger UI at `ui_path` that fetches its document from `spec_url`.
///
/// The document itself is not embedded; whoever serves `spec_url` can swap it
/// at runtime and the UI picks the new version up on reload. Authorization
/// entered in the UI survives page reloads.
///
/// ```ignore
/// let docs = swagger_ui_router("/docs", "/swagger.json");
/// ```
pub fn swagger_ui_router(ui_path: &'static str, spec_url: &'static str) -> Router {
    let config = Config::from(spec_url).persist_authorization(true);
    Router::new().merge(SwaggerUi::new(ui_path).config(config))
}
