use crate::ServerState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - publisher and watchdog status
pub async fn health(State(state): State<ServerState>) -> Response {
    let channels = state.app.publisher.snapshot().await;
    let since_feed = state.watchdog.since_last_feed();
    let watchdog_expired = state
        .watchdog_timeout
        .is_some_and(|timeout| since_feed > timeout);

    let status = if state.app.shutdown.is_shutdown() {
        "shutting_down"
    } else if watchdog_expired {
        "degraded"
    } else {
        "healthy"
    };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "channels": channels,
        "watchdog": {
            "enabled": state.watchdog_timeout.is_some(),
            "seconds_since_feed": since_feed.as_secs_f64(),
            "timeout_secs": state.watchdog_timeout.map(|t| t.as_secs()),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe; not ready once shutdown has begun
pub async fn readiness(State(state): State<ServerState>) -> Response {
    if state.app.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }
    (StatusCode::OK, "Ready").into_response()
}
