//! Package list handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::fetch::{Clock, PageSource};
use crate::pipeline::PackagePipeline;

/// `GET /`: package list, served from the one-minute page cache
pub async fn packages_handler<S, C>(State(pipeline): State<Arc<PackagePipeline<S, C>>>) -> Response
where
    S: PageSource,
    C: Clock,
{
    respond(&pipeline, true).await
}

/// `GET /now`: package list from a fresh upstream fetch
pub async fn now_handler<S, C>(State(pipeline): State<Arc<PackagePipeline<S, C>>>) -> Response
where
    S: PageSource,
    C: Clock,
{
    respond(&pipeline, false).await
}

// Logged-out is a normal 200 answer; only upstream failures become a 500.
async fn respond<S, C>(pipeline: &PackagePipeline<S, C>, use_cache: bool) -> Response
where
    S: PageSource,
    C: Clock,
{
    match pipeline.get_packages(use_cache).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            log::error!("Failed to fetch packages (use_cache={}): {}", use_cache, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch packages: {}", e),
            )
                .into_response()
        }
    }
}
