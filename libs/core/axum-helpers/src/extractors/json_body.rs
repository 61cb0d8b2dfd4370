//! JSON body extractor with structured rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Like [`axum::Json`], but a malformed body is answered with the standard
/// [`ErrorResponse`](crate::ErrorResponse) instead of a plain-text rejection.
///
/// ```ignore
/// async fn add_product(JsonBody(product): JsonBody<Product>) -> Json<Product> {
///     Json(product)
/// }
/// ```
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| JsonBody(value))
            .map_err(|rejection| AppError::from(rejection).into_response())
    }
}
