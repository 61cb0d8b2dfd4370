//! Products API routes

use axum::Router;
use domain_products::{handlers, UnimplementedProducts};

/// Create products router
pub fn router() -> Router {
    handlers::router(UnimplementedProducts)
}
