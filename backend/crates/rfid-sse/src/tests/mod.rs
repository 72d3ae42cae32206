mod sse_session;

use crate::{
    BroadcastError, Buzzer, FrameSink, Indicator, Metrics, Publisher, PublisherConfig,
    Result as BroadcastResult, SessionConfig, SessionPeripherals,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;

pub(crate) const CHANNEL: &str = "default channel";

/// Publisher with no pull delay so tests only wait on what they exercise
pub(crate) fn test_publisher(max_clients: usize, queue_capacity: usize) -> Publisher {
    Publisher::new(
        PublisherConfig {
            max_clients,
            queue_capacity,
            pull_delay: Duration::ZERO,
            delivery_timeout: None,
        },
        Metrics::new(),
    )
}

#[derive(Default)]
pub(crate) struct RecordingIndicator {
    ons: AtomicUsize,
    offs: AtomicUsize,
}

impl RecordingIndicator {
    pub(crate) fn ons(&self) -> usize {
        self.ons.load(Ordering::SeqCst)
    }

    pub(crate) fn offs(&self) -> usize {
        self.offs.load(Ordering::SeqCst)
    }
}

impl Indicator for RecordingIndicator {
    fn on(&self) {
        self.ons.fetch_add(1, Ordering::SeqCst);
    }

    fn off(&self) {
        self.offs.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct RecordingBuzzer {
    beeps: Mutex<Vec<(Instant, Duration)>>,
}

impl RecordingBuzzer {
    pub(crate) fn beeps(&self) -> Vec<(Instant, Duration)> {
        self.beeps.lock().unwrap().clone()
    }
}

impl Buzzer for RecordingBuzzer {
    fn beep(&self, duration: Duration) {
        self.beeps.lock().unwrap().push((Instant::now(), duration));
    }
}

pub(crate) fn recording_peripherals() -> (
    SessionPeripherals,
    Arc<RecordingIndicator>,
    Arc<RecordingBuzzer>,
) {
    let indicator = Arc::new(RecordingIndicator::default());
    let buzzer = Arc::new(RecordingBuzzer::default());
    let peripherals = SessionPeripherals {
        indicator: indicator.clone(),
        buzzer: buzzer.clone(),
    };
    (peripherals, indicator, buzzer)
}

/// Session timings with a short pulse and the default alert sequence
pub(crate) fn test_session_config() -> SessionConfig {
    SessionConfig {
        indicator_pulse: Duration::from_millis(10),
        ..SessionConfig::default()
    }
}

/// Sink that records frames and can be told to fail after N writes
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    frames: Arc<Mutex<Vec<Bytes>>>,
    fail_after: Option<usize>,
    unexpected: bool,
}

impl RecordingSink {
    pub(crate) fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Self::default()
        }
    }

    pub(crate) fn broken_internally() -> Self {
        Self {
            fail_after: Some(0),
            unexpected: true,
            ..Self::default()
        }
    }

    pub(crate) fn frames(&self) -> Vec<Bytes> {
        self.frames.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameSink for RecordingSink {
    async fn send_frame(&mut self, frame: Bytes) -> BroadcastResult<()> {
        let mut frames = self.frames.lock().unwrap();
        if self.fail_after.is_some_and(|limit| frames.len() >= limit) {
            return Err(if self.unexpected {
                BroadcastError::internal("sink exploded")
            } else {
                BroadcastError::transport(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            });
        }
        frames.push(frame);
        Ok(())
    }
}
