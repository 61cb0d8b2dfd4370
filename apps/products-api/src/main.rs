//! Products API - product routes with live Swagger documentation

use axum::Router;
use axum_helpers::server::{create_production_app, create_router, health_router};
use axum_helpers::ShutdownCoordinator;
use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod docs;

use config::{Cli, Config};
use docs::{DocSource, SwaggerLoader, WatchSettings};

/// Product routes under `/api`, documentation and health at the root.
fn build_router(config: &Config, loader: SwaggerLoader) -> Router {
    let root = docs::router(loader).merge(health_router(config.app.clone()));
    create_router(api::routes(), root)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    config.docs = config.docs.with_source_override(cli.source);

    init_tracing(&config.environment);

    let source = DocSource::resolve_from_exe(&config.docs.source);
    info!(%source, "Loading Swagger document");

    let loader = SwaggerLoader::new(source)
        .await
        .wrap_err("Initial load failed")?;

    let coordinator = ShutdownCoordinator::new();
    let watcher = docs::spawn_watcher(
        loader.clone(),
        WatchSettings::from(&config.docs),
        coordinator.clone(),
    )
    .wrap_err("Failed to start Swagger watcher")?;

    let app = build_router(&config, loader);

    info!(
        "Starting Products API on port {}, docs at {}/",
        config.server.port,
        docs::UI_PATH
    );

    create_production_app(
        app,
        &config.server,
        coordinator,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: waiting for Swagger watcher");
            if let Err(e) = watcher.await {
                tracing::warn!("Swagger watcher ended abnormally: {}", e);
            }
        },
    )
    .await
    .wrap_err("Server error")?;

    info!("Products API shutdown complete");
    Ok(())
}
