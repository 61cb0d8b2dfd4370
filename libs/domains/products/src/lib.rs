//! Products Domain
//!
//! The documented surface of the products resource: the [`Product`] model,
//! the Swagger 2.0 contract of its three operations, and an axum router
//! that serves them through a [`ProductController`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │  Handlers   │ ──▶ │ Controller  │  ← trait, stubbed by UnimplementedProducts
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │  Contract   │  ← paths, operation ids, Swagger fragment
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, ProductStatus
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{contract, handlers, UnimplementedProducts};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let router = handlers::router(UnimplementedProducts);
//!
//! let mut document = json!({"swagger": "2.0", "paths": {}});
//! contract::merge_into(&mut document)?;
//! # Ok(())
//! # }
//! ```

pub mod contract;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod models;

// Re-export commonly used types
pub use contract::{product_operations, swagger_fragment, ContractError, DeclaredOperation};
pub use controller::{ProductController, UnimplementedProducts};
pub use error::{ProductError, ProductResult};
pub use models::{product_definition, Product, ProductStatus};
