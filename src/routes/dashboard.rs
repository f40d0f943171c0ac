use std::path::Path;

use crate::{
    AppState,
    config::{AppConfig, Env},
};
use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use tower_http::services::{ServeDir, ServeFile};

/// Dashboard Router Module
///
/// Serves the built single-page application. Client-side routes such as
/// `/member/portfolio` have no file of their own, so unknown paths fall back
/// to `index.html` and the SPA router takes over in the browser.
pub fn dashboard_routes(dist_dir: &str) -> Router<AppState> {
    let index = Path::new(dist_dir).join("index.html");

    Router::new()
        // GET /health
        // Liveness probe. Outside both protected path families, so never gated.
        .route("/health", get(health))
        .fallback_service(ServeDir::new(dist_dir).fallback(ServeFile::new(index)))
}

async fn health(State(config): State<AppConfig>) -> Json<Value> {
    let env = match config.env {
        Env::Local => "local",
        Env::Production => "production",
    };
    Json(json!({ "status": "ok", "env": env }))
}
