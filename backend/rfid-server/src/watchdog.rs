use rfid_sse::{ShutdownCoordinator, SoftwareWatchdog};

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

/// Checks per timeout period
const CHECKS_PER_TIMEOUT: u32 = 4;

/// Trigger shutdown if `watchdog` goes unfed for longer than `timeout`.
///
/// Returns once it has fired or shutdown began elsewhere.
pub async fn run_watchdog_monitor(
    watchdog: Arc<SoftwareWatchdog>,
    timeout: Duration,
    shutdown: ShutdownCoordinator,
) {
    let check_interval = (timeout / CHECKS_PER_TIMEOUT).max(Duration::from_millis(10));
    let mut guard = shutdown.subscribe_guard();

    info!("Watchdog armed: {}s timeout", timeout.as_secs());

    loop {
        tokio::select! {
            _ = tokio::time::sleep(check_interval) => {}
            _ = guard.wait() => return,
        }

        if watchdog.is_expired(timeout) {
            error!(
                "Watchdog not fed for {:.1}s, initiating shutdown",
                watchdog.since_last_feed().as_secs_f64()
            );
            shutdown.shutdown();
            return;
        }
    }
}
