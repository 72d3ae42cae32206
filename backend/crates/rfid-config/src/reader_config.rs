use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const MIN_POLL_INTERVAL_MS: u64 = 10;
pub const DEFAULT_WATCHDOG_TIMEOUT_SECS: u64 = 30;

/// Card reader poll loop and its liveness watchdog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub enabled: bool,
    pub poll_interval_ms: u64,
    /// 0 disables the watchdog
    pub watchdog_timeout_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            watchdog_timeout_secs: DEFAULT_WATCHDOG_TIMEOUT_SECS,
        }
    }
}

impl ReaderConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(ConfigError::reader(format!(
                "reader.poll_interval_ms must be >= {}, got {}",
                MIN_POLL_INTERVAL_MS, self.poll_interval_ms
            )));
        }

        if self.watchdog_timeout_secs != 0
            && self.watchdog_timeout_secs.saturating_mul(1000) <= self.poll_interval_ms
        {
            return Err(ConfigError::reader(format!(
                "reader.watchdog_timeout_secs ({}s) must exceed poll_interval_ms ({}ms)",
                self.watchdog_timeout_secs, self.poll_interval_ms
            )));
        }

        Ok(())
    }
}
