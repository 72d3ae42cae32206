
use rfid_sse::{Buzzer, Metrics, Publisher, PublisherConfig};

use std::sync::Mutex;
use std::time::Duration;

pub(crate) const CHANNEL: &str = "default channel";

pub(crate) fn test_publisher() -> Publisher {
    Publisher::new(
        PublisherConfig {
            pull_delay: Duration::ZERO,
            ..PublisherConfig::default()
        },
        Metrics::new(),
    )
}

#[derive(Default)]
pub(crate) struct RecordingBuzzer {
    beeps: Mutex<Vec<Duration>>,
}

impl RecordingBuzzer {
    pub(crate) fn beeps(&self) -> Vec<Duration> {
        self.beeps.lock().unwrap().clone()
    }
}

impl Buzzer for RecordingBuzzer {
    fn beep(&self, duration: Duration) {
        self.beeps.lock().unwrap().push(duration);
    }
}
