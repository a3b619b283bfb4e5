use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use flights::FlightsModule;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Top-level router: health probe plus the flights routes under
/// `base_path`, wrapped in request tracing and a timeout.
pub fn build_router(cfg: &ServerConfig, module: &FlightsModule) -> Router {
    let flights = module.router();
    let app = Router::new().route("/health", get(health));

    let app = if cfg.base_path == "/" {
        app.merge(flights)
    } else {
        app.nest(&cfg.base_path, flights)
    };

    app.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_millis(cfg.request_timeout_ms),
    ))
    .layer(TraceLayer::new_for_http())
}

#[allow(clippy::unused_async)]
async fn health() -> &'static str {
    "ok"
}
