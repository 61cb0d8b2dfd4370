use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::openapi::Ref;
use utoipa::{PartialSchema, ToSchema};

use crate::contract::PRODUCT_STATUS;

/// A value of the `product_status` schema.
///
/// That schema is owned by whoever assembles the full API document, so the
/// value is carried as opaque JSON and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductStatus(Value);

impl ProductStatus {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

fn product_status_schema() -> Ref {
    Ref::new(PRODUCT_STATUS.pointer())
}

/// Product entity as exposed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// The unique identifier of a product in our catalog.
    pub id: i64,
    #[schema(schema_with = product_status_schema)]
    pub status: ProductStatus,
}

impl Product {
    pub fn new(id: i64, status: ProductStatus) -> Self {
        Self { id, status }
    }
}

/// JSON schema of [`Product`], as published under `definitions.product`.
pub fn product_definition() -> serde_json::Result<Value> {
    serde_json::to_value(Product::schema())
}
