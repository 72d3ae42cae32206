use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_INDICATOR_PULSE_MS: u64 = 1000;
pub const DEFAULT_ALERT_BEEPS: u32 = 3;
pub const MAX_ALERT_BEEPS: u32 = 10;
pub const DEFAULT_ALERT_BEEP_MS: u64 = 1000;
pub const DEFAULT_ALERT_SPACING_MS: u64 = 1000;
pub const DEFAULT_READ_BEEP_MS: u64 = 50;

/// Timings for the LED and buzzer feedback.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeripheralsConfig {
    /// How long the stream LED stays on after each delivered frame
    pub indicator_pulse_ms: u64,
    /// Number of beeps when a subscriber disconnects
    pub alert_beeps: u32,
    pub alert_beep_ms: u64,
    /// Pause between disconnect beeps
    pub alert_spacing_ms: u64,
    /// Beep length acknowledging a card read
    pub read_beep_ms: u64,
}

impl Default for PeripheralsConfig {
    fn default() -> Self {
        Self {
            indicator_pulse_ms: DEFAULT_INDICATOR_PULSE_MS,
            alert_beeps: DEFAULT_ALERT_BEEPS,
            alert_beep_ms: DEFAULT_ALERT_BEEP_MS,
            alert_spacing_ms: DEFAULT_ALERT_SPACING_MS,
            read_beep_ms: DEFAULT_READ_BEEP_MS,
        }
    }
}

impl PeripheralsConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.alert_beeps > MAX_ALERT_BEEPS {
            return Err(ConfigError::peripherals(format!(
                "peripherals.alert_beeps must be 0-{}, got {}",
                MAX_ALERT_BEEPS, self.alert_beeps
            )));
        }

        Ok(())
    }
}
