//! # Axum Helpers
//!
//! Shared building blocks for the HTTP services in this workspace.
//!
//! - **[`server`]**: router assembly, health endpoint, graceful shutdown
//! - **[`docs`]**: Swagger UI mounting
//! - **[`http`]**: security headers middleware
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: path and JSON body extractors

pub mod docs;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use docs::swagger_ui_router;
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{IdPath, JsonBody};
pub use http::security_headers;
pub use server::{
    HealthResponse, ShutdownCoordinator, create_production_app, create_router, health_router,
};
