//! Integer identifier path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extractor for a single `i64` path parameter.
///
/// Anything that does not parse as a 64-bit signed integer is rejected with a
/// 400 `INVALID_PATH_PARAM` body instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn get_product(IdPath(id): IdPath) -> String {
///     format!("Product {}", id)
/// }
///
/// let app = Router::new().route("/products/{product_id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i64>().map(IdPath).map_err(|_| {
            AppError::InvalidPathParam(format!("Expected a 64-bit integer, got '{}'", raw))
                .into_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/items/{item_id}",
            get(|IdPath(id): IdPath| async move { id.to_string() }),
        )
    }

    async fn status_for(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_accepts_i64_bounds() {
        assert_eq!(status_for("/items/42").await, StatusCode::OK);
        assert_eq!(status_for("/items/-9223372036854775808").await, StatusCode::OK);
        assert_eq!(status_for("/items/9223372036854775807").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejects_non_integers() {
        assert_eq!(status_for("/items/abc").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/items/1.5").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/items/9223372036854775808").await, StatusCode::BAD_REQUEST);
    }
}
