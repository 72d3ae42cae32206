#![allow(dead_code)]

//! Test infrastructure for rfid-sse HTTP tests

use rfid_sse::{
    AppState, LogBuzzer, LogIndicator, Metrics, Publisher, PublisherConfig, SessionConfig,
    SessionPeripherals, ShutdownCoordinator, subscribe_handler,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, Bytes},
    http::Request,
    routing::get,
};
use http_body_util::BodyExt;

pub const CHANNEL: &str = "default channel";

/// AppState with short timings so streaming tests finish quickly
pub fn create_test_app_state(max_clients: usize) -> AppState {
    let metrics = Metrics::new();
    let publisher = Publisher::new(
        PublisherConfig {
            max_clients,
            queue_capacity: 15,
            pull_delay: Duration::ZERO,
            delivery_timeout: None,
        },
        metrics.clone(),
    );

    AppState {
        publisher,
        channel: CHANNEL.to_string(),
        peripherals: SessionPeripherals {
            indicator: Arc::new(LogIndicator::new("green")),
            buzzer: Arc::new(LogBuzzer),
        },
        session_config: SessionConfig {
            indicator_pulse: Duration::from_millis(5),
            alert_beeps: 3,
            alert_beep: Duration::from_millis(5),
            alert_spacing: Duration::from_millis(5),
        },
        metrics,
        shutdown: ShutdownCoordinator::new(),
    }
}

pub fn create_test_router(state: AppState) -> Router {
    Router::new()
        .route("/subscribe", get(subscribe_handler))
        .with_state(state)
}

pub fn subscribe_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/subscribe")
        .body(Body::empty())
        .unwrap()
}

/// Read the next data frame from a streaming body
pub async fn next_frame(body: &mut Body) -> Option<Bytes> {
    loop {
        let frame = body.frame().await?.unwrap();
        if let Ok(data) = frame.into_data() {
            return Some(data);
        }
    }
}

/// Wait until `count` subscribers are registered on the test channel
pub async fn wait_for_subscribers(publisher: &Publisher, count: usize) {
    while publisher.subscriber_count(CHANNEL).await != count {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
