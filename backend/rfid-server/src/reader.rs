use rfid_sse::{Buzzer, Indicator, Metrics, Publisher, ShutdownGuard, Watchdog};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Source of card ids.
#[async_trait]
pub trait CardReader: Send {
    /// Poll once. `Ok(None)` means no card is present right now.
    async fn read(&mut self) -> std::io::Result<Option<String>>;
}

/// Card reader fed one id per line from an async byte stream.
///
/// Lines are collected in the background, so `read` never waits for input.
pub struct LineCardReader {
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    exhausted: bool,
}

impl LineCardReader {
    pub fn new<R>(source: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, lines) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut source = BufReader::new(source).lines();
            loop {
                let item = match source.next_line().await {
                    Ok(Some(line)) => Ok(line),
                    Ok(None) => break,
                    Err(e) => Err(e),
                };
                let failed = item.is_err();
                if tx.send(item).is_err() || failed {
                    break;
                }
            }
        });

        Self {
            lines,
            exhausted: false,
        }
    }

    /// Reader on the process's standard input
    pub fn stdin() -> Self {
        Self::new(tokio::io::stdin())
    }
}

#[async_trait]
impl CardReader for LineCardReader {
    async fn read(&mut self) -> std::io::Result<Option<String>> {
        loop {
            match self.lines.try_recv() {
                Ok(Ok(line)) => {
                    let id = line.trim();
                    if !id.is_empty() {
                        return Ok(Some(id.to_string()));
                    }
                }
                Ok(Err(e)) => return Err(e),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => {
                    if !self.exhausted {
                        info!("Card reader input closed");
                        self.exhausted = true;
                    }
                    return Ok(None);
                }
            }
        }
    }
}

/// Devices the reader loop drives
#[derive(Clone)]
pub struct ReaderPeripherals {
    /// Lit while the last poll produced a card
    pub indicator: Arc<dyn Indicator>,
    pub buzzer: Arc<dyn Buzzer>,
    pub watchdog: Arc<dyn Watchdog>,
}

#[derive(Debug, Clone)]
pub struct ReaderLoopConfig {
    pub poll_interval: Duration,
    /// Confirmation beep after a successful read
    pub read_beep: Duration,
}

impl From<&rfid_config::Config> for ReaderLoopConfig {
    fn from(config: &rfid_config::Config) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.reader.poll_interval_ms),
            read_beep: Duration::from_millis(config.peripherals.read_beep_ms),
        }
    }
}

/// Poll `reader` until shutdown, publishing every card id to `channel`.
///
/// Each cycle feeds the watchdog, waits one poll interval, clears the
/// indicator, then reads. A read beeps, lights the indicator and publishes.
pub async fn run_reader_loop<R: CardReader>(
    mut reader: R,
    publisher: Publisher,
    channel: String,
    peripherals: ReaderPeripherals,
    config: ReaderLoopConfig,
    metrics: Metrics,
    mut shutdown: ShutdownGuard,
) {
    info!(
        "Card reader started (poll every {}ms)",
        config.poll_interval.as_millis()
    );

    loop {
        peripherals.watchdog.feed();

        tokio::select! {
            _ = tokio::time::sleep(config.poll_interval) => {}
            _ = shutdown.wait() => break,
        }

        peripherals.indicator.off();

        let id = match reader.read().await {
            Ok(Some(id)) => id,
            Ok(None) => continue,
            Err(e) => {
                warn!("Card read failed: {e}");
                continue;
            }
        };

        info!("Card read: {id}");
        metrics.card_read();
        peripherals.buzzer.beep(config.read_beep);
        peripherals.indicator.on();

        tokio::select! {
            report = publisher.publish(&id, &channel) => {
                debug!("Card {id} delivered to {} subscribers", report.subscribers);
            }
            _ = shutdown.wait() => break,
        }
    }

    peripherals.indicator.off();
    info!("Card reader stopped");
}
