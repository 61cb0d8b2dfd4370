//! Product controller seam and its placeholder implementation.

use async_trait::async_trait;
use tracing::instrument;

use crate::contract::{ADD_PRODUCT, GET_PRODUCT, UPDATE_PRODUCT};
use crate::error::{ProductError, ProductResult};
use crate::models::Product;

/// Operations of the products resource.
///
/// Handlers are generic over this trait, so a real backend can replace
/// [`UnimplementedProducts`] without touching routing or documentation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductController: Send + Sync {
    /// `getProduct`
    async fn get_product(&self, id: i64) -> ProductResult<Product>;

    /// `updateProduct`
    async fn update_product(&self, id: i64, product: Product) -> ProductResult<Product>;

    /// `addProduct`
    async fn add_product(&self, product: Product) -> ProductResult<Product>;
}

/// Controller whose every operation fails with [`ProductError::NotImplemented`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedProducts;

#[async_trait]
impl ProductController for UnimplementedProducts {
    #[instrument(skip(self))]
    async fn get_product(&self, id: i64) -> ProductResult<Product> {
        Err(ProductError::NotImplemented(GET_PRODUCT))
    }

    #[instrument(skip(self, _product))]
    async fn update_product(&self, id: i64, _product: Product) -> ProductResult<Product> {
        Err(ProductError::NotImplemented(UPDATE_PRODUCT))
    }

    #[instrument(skip_all)]
    async fn add_product(&self, _product: Product) -> ProductResult<Product> {
        Err(ProductError::NotImplemented(ADD_PRODUCT))
    }
}
