#![allow(dead_code)]

//! Test infrastructure for rfid-server route tests

use rfid_server::ServerState;
use rfid_sse::{
    AppState, LogBuzzer, LogIndicator, Metrics, Publisher, PublisherConfig, SessionConfig,
    SessionPeripherals, ShutdownCoordinator, SoftwareWatchdog,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::Request,
};
use http_body_util::BodyExt;

pub const CHANNEL: &str = "default channel";

/// ServerState with default limits and fast session feedback
pub fn create_test_server_state() -> ServerState {
    let metrics = Metrics::new();
    let publisher = Publisher::new(
        PublisherConfig {
            pull_delay: Duration::ZERO,
            ..PublisherConfig::default()
        },
        metrics.clone(),
    );

    ServerState {
        app: AppState {
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
        },
        watchdog: Arc::new(SoftwareWatchdog::new()),
        watchdog_timeout: Some(Duration::from_secs(30)),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
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
