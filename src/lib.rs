use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod config;
pub mod gateway;
pub mod guard;
pub mod profile;
pub mod session;

pub mod routes;
use routes::dashboard;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use gateway::{ApiGateway, GatewayError};
pub use guard::{RouteGuard, Verdict};
pub use session::{CookieSessionStore, MemorySessionStore, Role, SessionContext, StoredCredential};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// AppState
///
/// Shared state of the dashboard host. Holds only the immutable configuration;
/// session state is per request and read from cookies.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// route_guard
///
/// Runs the Route Guard on every navigation before it reaches a page.
///
/// The `role` and `token` cookies of the request form the session. On a
/// redirect verdict the page is never served; the browser receives
/// `303 See Other` pointing at the matching login page.
async fn route_guard(jar: CookieJar, request: Request, next: Next) -> Response {
    let guard = RouteGuard::new(SessionContext::new(CookieSessionStore::from_jar(jar)));

    match guard.check(request.uri().path()) {
        Verdict::Allow => next.run(request).await,
        Verdict::Redirect(target) => Redirect::to(target).into_response(),
    }
}

/// create_router
///
/// Assembles the dashboard host: the SPA routes, the Route Guard in front of
/// all of them, and the observability layers around everything.
pub fn create_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    // The guard sits on `layer`, not `route_layer`, so the SPA fallback is gated as well.
    let guarded = dashboard::dashboard_routes(&state.config.dist_dir)
        .layer(middleware::from_fn(route_guard))
        .with_state(state);

    // Outermost first: id assignment, navigation span, id echoed on the response.
    let observability = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(navigation_span)
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header));

    guarded.layer(observability).layer(CorsLayer::permissive())
}

/// Opens the span a navigation is logged under. The guard's allow/redirect
/// events land inside it, so a redirect can be traced back to its request id
/// and path.
fn navigation_span(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "navigation",
        method = %request.method(),
        path = %request.uri().path(),
        request_id,
    )
}
