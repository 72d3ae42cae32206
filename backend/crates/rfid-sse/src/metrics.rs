use metrics::{counter, gauge};

/// Metrics collector for subscriber and delivery events
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "rfid_sse" }
    }

    pub fn subscriber_admitted(&self) {
        counter!(format!("{}.subscribers.admitted", self.prefix)).increment(1);
        gauge!(format!("{}.subscribers.active", self.prefix)).increment(1.0);
    }

    /// Admission refused because the channel was full
    pub fn subscriber_rejected(&self) {
        counter!(format!("{}.subscribers.rejected", self.prefix)).increment(1);
    }

    pub fn subscriber_removed(&self) {
        counter!(format!("{}.subscribers.removed", self.prefix)).increment(1);
        gauge!(format!("{}.subscribers.active", self.prefix)).decrement(1.0);
    }

    pub fn published(&self, subscriber_count: usize, lines_enqueued: usize) {
        counter!(format!("{}.publish.calls", self.prefix)).increment(1);
        counter!(format!("{}.publish.lines_enqueued", self.prefix))
            .increment(lines_enqueued as u64);
        gauge!(format!("{}.publish.subscribers", self.prefix)).set(subscriber_count as f64);
    }

    pub fn delivery_timed_out(&self) {
        counter!(format!("{}.publish.timed_out", self.prefix)).increment(1);
    }

    pub fn frame_sent(&self) {
        counter!(format!("{}.frames.sent", self.prefix)).increment(1);
    }

    /// Record how a streaming session ended
    pub fn session_ended(&self, outcome: &str) {
        counter!(format!("{}.sessions.ended", self.prefix)).increment(1);
        counter!(format!("{}.sessions.ended.{}", self.prefix, outcome)).increment(1);
    }

    pub fn card_read(&self) {
        counter!(format!("{}.reader.cards", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
