//! HTTP server exposing the package list.
//!
//! Provides two endpoints:
//! - `/` - package list, cached for one minute
//! - `/now` - package list from a fresh fetch
//!
//! Both answer `200` with `{"items": [...], "loggedIn": bool}`; an upstream
//! failure answers `500`. CORS is open to any origin.

mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::fetch::{Clock, PageSource};
use crate::pipeline::PackagePipeline;

use handlers::{now_handler, packages_handler};

/// Builds the router around a shared pipeline.
pub fn router<S, C>(pipeline: Arc<PackagePipeline<S, C>>) -> Router
where
    S: PageSource + 'static,
    C: Clock + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(packages_handler::<S, C>))
        .route("/now", get(now_handler::<S, C>))
        .layer(cors)
        .with_state(pipeline)
}

/// Binds `bind:port` and serves until Ctrl-C.
pub async fn start_server<S, C>(
    bind: &str,
    port: u16,
    pipeline: Arc<PackagePipeline<S, C>>,
) -> Result<(), anyhow::Error>
where
    S: PageSource + 'static,
    C: Clock + 'static,
{
    let listener = TcpListener::bind(format!("{}:{}", bind, port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}:{}: {}", bind, port, e))?;

    log::info!("Server listening on http://{}:{}/", bind, port);
    log::info!("  - Cached: http://{}:{}/", bind, port);
    log::info!("  - Fresh:  http://{}:{}/now", bind, port);

    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
