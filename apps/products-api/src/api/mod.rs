//! API routes module

pub mod products;

use axum::Router;

/// Create all API routes; mounted under `/api` by the server.
pub fn routes() -> Router {
    Router::new().merge(products::router())
}
