use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::{debug, info};
use tokio::time::Instant;

/// On/off feedback light (LED).
pub trait Indicator: Send + Sync {
    fn on(&self);
    fn off(&self);
}

/// Audible alert. `beep` starts a tone of `duration` and returns immediately.
pub trait Buzzer: Send + Sync {
    fn beep(&self, duration: Duration);
}

/// Liveness timer that must be fed regularly.
pub trait Watchdog: Send + Sync {
    fn feed(&self);
}

/// Indicator that reports state changes to the log
pub struct LogIndicator {
    name: &'static str,
    lit: AtomicBool,
}

impl LogIndicator {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            lit: AtomicBool::new(false),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit.load(Ordering::Acquire)
    }
}

impl Indicator for LogIndicator {
    fn on(&self) {
        if !self.lit.swap(true, Ordering::AcqRel) {
            debug!("{} LED on", self.name);
        }
    }

    fn off(&self) {
        if self.lit.swap(false, Ordering::AcqRel) {
            debug!("{} LED off", self.name);
        }
    }
}

/// Buzzer that logs each beep
pub struct LogBuzzer;

impl Buzzer for LogBuzzer {
    fn beep(&self, duration: Duration) {
        info!("Beep ({}ms)", duration.as_millis());
    }
}

/// In-process stand-in for a hardware watchdog.
///
/// Only records when it was last fed; a monitor task decides what expiry means.
pub struct SoftwareWatchdog {
    last_feed: Mutex<Instant>,
}

impl SoftwareWatchdog {
    pub fn new() -> Self {
        Self {
            last_feed: Mutex::new(Instant::now()),
        }
    }

    pub fn since_last_feed(&self) -> Duration {
        let last = *self
            .last_feed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        last.elapsed()
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.since_last_feed() > timeout
    }
}

impl Default for SoftwareWatchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog for SoftwareWatchdog {
    fn feed(&self) {
        *self
            .last_feed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Instant::now();
    }
}
