use crate::{ServerState, handlers, health};

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        // Event stream
        .route("/subscribe", get(rfid_sse::subscribe_handler))
        // Publishing endpoints
        .route("/hello", get(handlers::hello))
        .route("/id", get(handlers::card_id))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state)
        // EventSource clients may be served from another origin
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
