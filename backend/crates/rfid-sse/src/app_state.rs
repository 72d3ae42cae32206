use crate::{
    Metrics, Publisher, SessionConfig, SessionPeripherals, ShutdownCoordinator, SseSession,
    create_session_span,
    frame::{CLIENTS_FULL_MESSAGE, EVENT_STREAM_CONTENT_TYPE},
    frame_sink,
};

use axum::{
    body::Body,
    extract::State,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use log::{info, warn};
use tracing::Instrument;

/// Frames buffered between a session and its response body
const BODY_BUFFER_FRAMES: usize = 1;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub publisher: Publisher,
    /// Channel every route publishes to and subscribes on
    pub channel: String,
    pub peripherals: SessionPeripherals,
    pub session_config: SessionConfig,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
}

/// GET /subscribe - open an event stream of card reads
pub async fn subscribe_handler(State(state): State<AppState>) -> Response {
    let Some(subscription) = state.publisher.subscribe(&state.channel).await else {
        warn!(
            "Rejected subscriber on '{}': channel at capacity",
            state.channel
        );
        return (
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            CLIENTS_FULL_MESSAGE,
        )
            .into_response();
    };

    info!(
        "Subscriber {} connected to '{}'",
        subscription.id, state.channel
    );

    let span = create_session_span(&subscription.id.to_string(), &state.channel);
    let (sink, frames) = frame_sink::channel(BODY_BUFFER_FRAMES);
    let session = SseSession::new(
        subscription,
        state.publisher.clone(),
        sink,
        state.peripherals.clone(),
        state.session_config.clone(),
        state.metrics.clone(),
    );
    let shutdown_guard = state.shutdown.subscribe_guard();

    tokio::spawn(
        async move {
            session.run(shutdown_guard).await;
        }
        .instrument(span),
    );

    (
        [
            (CONTENT_TYPE, EVENT_STREAM_CONTENT_TYPE),
            (CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames.into_stream()),
    )
        .into_response()
}
