//! HTTP server setup and routing for npt-ps

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::state::AppState;

/// Build the router with all search routes
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/api/search/phrase", get(super::handlers::phrase_search))
        .route("/api/search/title", get(super::handlers::title_search))
        .route("/api/search/author", get(super::handlers::author_search))
        .route("/api/search/citation", get(super::handlers::citation_search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn run(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn status() -> Json<serde_json::Value> {
    Json(json!({
        "service": "npt-ps",
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": env!("GIT_HASH"),
        "build_timestamp": env!("BUILD_TIMESTAMP"),
        "build_profile": env!("BUILD_PROFILE"),
        "status": "running",
    }))
}

async fn search_page() -> Html<&'static str> {
    Html(include_str!("search.html"))
}
