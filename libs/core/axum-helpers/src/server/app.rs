use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::security::security_headers;
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

/// Combines API routes and documentation routes with the cross-cutting layers.
///
/// - `apis` are nested under `/api`
/// - `docs` (Swagger UI, raw documents, health) are merged at the root
/// - unmatched paths get the JSON 404 body
/// - every response goes through request tracing, security headers and compression
///
/// Routers passed in must already have their state applied.
pub fn create_router(apis: Router, docs: Router) -> Router {
    Router::new()
        .nest("/api", apis)
        .merge(docs)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new())
}

/// Serves `router` until SIGINT/SIGTERM or an explicit `coordinator.shutdown()`.
///
/// After the signal, `cleanup` runs with `shutdown_timeout` as its upper bound.
/// Background tasks that hold a clone of `coordinator` observe the same signal.
///
/// ```ignore
/// let coordinator = ShutdownCoordinator::new();
/// create_production_app(router, &config, coordinator, Duration::from_secs(30), async {}).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_handle = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        signal_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let graceful = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { graceful.wait_for_shutdown().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // serve can also end on error; release the cleanup task either way
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
