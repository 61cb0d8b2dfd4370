//! Server infrastructure: router assembly, health endpoint, graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let docs = health_router(core_config::app_info!());
//! let router = create_router(api_routes, docs);
//! create_production_app(router, &config, coordinator, timeout, async {}).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthResponse, health_handler, health_router};
pub use shutdown::ShutdownCoordinator;
