//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The panel page is served at `/`, the refresh script's JSON API under
//! `/api`, and static assets (stylesheet, script, logos) under `/assets`.

pub mod panel;

use std::path::Path;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, put};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState, assets_dir: &Path) -> Router {
    Router::new()
        .route("/", get(panel::page))
        .route("/api/values", get(panel::values))
        .route("/api/devices", get(panel::devices))
        .route("/api/controls/{id}", put(panel::put_control))
        .route("/healthz", get(healthz))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
