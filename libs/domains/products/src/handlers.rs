//! HTTP handlers for Products API

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{IdPath, JsonBody};
use std::sync::Arc;

use crate::contract::{PRODUCTS_PATH, PRODUCT_PATH};
use crate::controller::ProductController;
use crate::error::ProductResult;
use crate::models::Product;

/// Create the products router.
///
/// Routes are registered under the same templates the Swagger contract
/// documents, so the router is meant to be nested under the document's
/// `basePath`.
pub fn router<C: ProductController + 'static>(controller: C) -> Router {
    let shared_controller = Arc::new(controller);

    Router::new()
        .route(PRODUCTS_PATH, post(add_product::<C>))
        .route(
            PRODUCT_PATH,
            get(get_product::<C>).post(update_product::<C>),
        )
        .with_state(shared_controller)
}

async fn get_product<C: ProductController>(
    State(controller): State<Arc<C>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    let product = controller.get_product(id).await?;
    Ok(Json(product))
}

async fn update_product<C: ProductController>(
    State(controller): State<Arc<C>>,
    IdPath(id): IdPath,
    JsonBody(product): JsonBody<Product>,
) -> ProductResult<Json<Product>> {
    let product = controller.update_product(id, product).await?;
    Ok(Json(product))
}

async fn add_product<C: ProductController>(
    State(controller): State<Arc<C>>,
    JsonBody(product): JsonBody<Product>,
) -> ProductResult<Json<Product>> {
    let product = controller.add_product(product).await?;
    Ok(Json(product))
}
