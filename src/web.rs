use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::state::AppState;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api", api::router(state)).layer(cors)
}

/// Bind and serve until shutdown.
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let port = state.config.server.port;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HopeBites API running at http://localhost:{}", port);
    axum::serve(listener, app(state))
        .await
        .context("Server error")?;
    Ok(())
}
