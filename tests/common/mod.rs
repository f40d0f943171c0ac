#![allow(dead_code)]

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, Uri, header},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Echoes what the backend saw: the request path and its Authorization header.
pub async fn echo_request(headers: HeaderMap, uri: Uri) -> Json<Value> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    Json(json!({ "path": uri.path(), "authorization": authorization }))
}

/// A stand-in for the investment backend, mounted under `/api` like the real one.
pub fn echo_backend() -> Router {
    Router::new()
        .route("/api/administrators/profile/", get(echo_request))
        .route("/api/echo", get(echo_request).post(echo_request).delete(echo_request))
        .route(
            "/api/unauthorized",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "detail": "Authentication credentials were not provided." })),
                )
            }),
        )
}

/// A backend that rejects every profile request.
pub fn rejecting_backend() -> Router {
    Router::new().route(
        "/api/administrators/profile/",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid token." }))) }),
    )
}

/// Serves `router` on an ephemeral port and returns the base URL (`.../api`).
pub async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://127.0.0.1:{}/api", port)
}

/// A base URL nothing listens on.
pub async fn dead_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    format!("http://127.0.0.1:{}/api", port)
}
