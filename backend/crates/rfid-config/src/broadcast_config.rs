use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CHANNEL, DEFAULT_DELIVERY_TIMEOUT_MS,
    DEFAULT_MAX_CLIENTS, DEFAULT_PULL_DELAY_MS, DEFAULT_QUEUE_CAPACITY, MAX_MAX_CLIENTS,
    MAX_PULL_DELAY_MS, MAX_QUEUE_CAPACITY, MIN_MAX_CLIENTS,
};

use serde::Deserialize;

/// Fan-out settings for the card event publisher.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Channel used by every HTTP route
    pub default_channel: String,
    /// Maximum live subscribers per channel
    pub max_clients: usize,
    /// Per-subscriber queue capacity (0 = unbounded)
    pub queue_capacity: usize,
    /// Delay before each pull from a subscriber queue
    pub pull_delay_ms: u64,
    /// Upper bound on how long publish waits for one subscriber (0 = forever)
    pub delivery_timeout_ms: u64,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            default_channel: String::from(DEFAULT_CHANNEL),
            max_clients: DEFAULT_MAX_CLIENTS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pull_delay_ms: DEFAULT_PULL_DELAY_MS,
            delivery_timeout_ms: DEFAULT_DELIVERY_TIMEOUT_MS,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.default_channel.is_empty() {
            return Err(ConfigError::broadcast(
                "broadcast.default_channel must not be empty",
            ));
        }

        if self.max_clients < MIN_MAX_CLIENTS || self.max_clients > MAX_MAX_CLIENTS {
            return Err(ConfigError::broadcast(format!(
                "broadcast.max_clients must be {}-{}, got {}",
                MIN_MAX_CLIENTS, MAX_MAX_CLIENTS, self.max_clients
            )));
        }

        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::broadcast(format!(
                "broadcast.queue_capacity must be 0-{}, got {}",
                MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.pull_delay_ms > MAX_PULL_DELAY_MS {
            return Err(ConfigError::broadcast(format!(
                "broadcast.pull_delay_ms must be 0-{}, got {}",
                MAX_PULL_DELAY_MS, self.pull_delay_ms
            )));
        }

        Ok(())
    }
}
