use std::time::Duration;

/// Configuration for the publisher and the streams it hands out
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Maximum live subscribers per channel
    pub max_clients: usize,
    /// Capacity of each subscriber queue (0 = unbounded)
    pub queue_capacity: usize,
    /// Delay before every pull from a subscriber queue
    pub pull_delay: Duration,
    /// Bound on how long one publish waits for a single subscriber
    pub delivery_timeout: Option<Duration>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            max_clients: rfid_config::DEFAULT_MAX_CLIENTS,
            queue_capacity: rfid_config::DEFAULT_QUEUE_CAPACITY,
            pull_delay: Duration::from_millis(rfid_config::DEFAULT_PULL_DELAY_MS),
            delivery_timeout: None,
        }
    }
}

impl From<&rfid_config::BroadcastConfig> for PublisherConfig {
    fn from(config: &rfid_config::BroadcastConfig) -> Self {
        Self {
            max_clients: config.max_clients,
            queue_capacity: config.queue_capacity,
            pull_delay: Duration::from_millis(config.pull_delay_ms),
            delivery_timeout: match config.delivery_timeout_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }
}
