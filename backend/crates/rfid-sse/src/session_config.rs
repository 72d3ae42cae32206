use std::time::Duration;

/// Feedback timings for a streaming session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long the stream indicator stays lit after each frame
    pub indicator_pulse: Duration,
    /// Beeps sounded when the client disconnects
    pub alert_beeps: u32,
    pub alert_beep: Duration,
    pub alert_spacing: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            indicator_pulse: Duration::from_secs(1),
            alert_beeps: 3,
            alert_beep: Duration::from_secs(1),
            alert_spacing: Duration::from_secs(1),
        }
    }
}

impl From<&rfid_config::PeripheralsConfig> for SessionConfig {
    fn from(config: &rfid_config::PeripheralsConfig) -> Self {
        Self {
            indicator_pulse: Duration::from_millis(config.indicator_pulse_ms),
            alert_beeps: config.alert_beeps,
            alert_beep: Duration::from_millis(config.alert_beep_ms),
            alert_spacing: Duration::from_millis(config.alert_spacing_ms),
        }
    }
}
