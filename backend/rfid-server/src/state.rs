use rfid_sse::{AppState, SoftwareWatchdog};

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

/// Router state: the streaming state plus what the health endpoints report on
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub watchdog: Arc<SoftwareWatchdog>,
    /// `None` when the watchdog monitor is disabled
    pub watchdog_timeout: Option<Duration>,
}

impl FromRef<ServerState> for AppState {
    fn from_ref(state: &ServerState) -> Self {
        state.app.clone()
    }
}
