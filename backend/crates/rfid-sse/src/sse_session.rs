use crate::{
    BroadcastError, Buzzer, FrameSink, Indicator, Metrics, Publisher, SessionConfig,
    ShutdownGuard, SubscriberId, Subscription, frame::encode_card_frame,
};

use std::sync::Arc;

use futures::StreamExt;
use futures::stream::BoxStream;
use log::{debug, error, info, warn};

/// Feedback devices a session drives
#[derive(Clone)]
pub struct SessionPeripherals {
    /// Pulsed after every delivered frame
    pub indicator: Arc<dyn Indicator>,
    /// Sounds the disconnect alert
    pub buzzer: Arc<dyn Buzzer>,
}

/// How a streaming session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The subscription was removed elsewhere and its stream ended
    Closed,
    /// The client went away, seen on a write or while idle
    Disconnected,
    /// Something other than the client connection failed
    Failed,
    /// The server is shutting down
    Shutdown,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Streams one subscriber's lines to one client as `card` events.
pub struct SseSession<S: FrameSink> {
    lines: BoxStream<'static, String>,
    cleanup: SubscriptionGuard,
    sink: S,
    peripherals: SessionPeripherals,
    config: SessionConfig,
    metrics: Metrics,
}

impl<S: FrameSink> SseSession<S> {
    pub fn new(
        subscription: Subscription,
        publisher: Publisher,
        sink: S,
        peripherals: SessionPeripherals,
        config: SessionConfig,
        metrics: Metrics,
    ) -> Self {
        let Subscription {
            id,
            channel,
            stream,
        } = subscription;

        let cleanup = SubscriptionGuard {
            publisher,
            subscriber_id: id,
            channel,
            indicator: Arc::clone(&peripherals.indicator),
            indicator_cleared: false,
            released: false,
        };

        Self {
            lines: stream.into_stream().boxed(),
            cleanup,
            sink,
            peripherals,
            config,
            metrics,
        }
    }

    pub fn subscriber_id(&self) -> SubscriberId {
        self.cleanup.subscriber_id
    }

    /// Run until the stream ends, the client goes away, or shutdown.
    ///
    /// Whatever the exit path, the subscriber is unsubscribed and the
    /// indicator cleared exactly once.
    pub async fn run(mut self, mut shutdown: ShutdownGuard) -> SessionOutcome {
        let subscriber_id = self.subscriber_id();
        info!(
            "Streaming session started for subscriber {subscriber_id} on '{}'",
            self.cleanup.channel
        );

        let outcome = self.stream_frames(&mut shutdown).await;

        let Self {
            cleanup, metrics, ..
        } = self;
        cleanup.release().await;
        metrics.session_ended(outcome.as_str());

        info!(
            "Streaming session for subscriber {subscriber_id} ended: {}",
            outcome.as_str()
        );
        outcome
    }

    async fn stream_frames(&mut self, shutdown: &mut ShutdownGuard) -> SessionOutcome {
        let subscriber_id = self.subscriber_id();

        loop {
            let line = tokio::select! {
                line = self.lines.next() => line,
                _ = self.sink.closed() => {
                    warn!("Subscriber {subscriber_id} disconnected while idle");
                    self.sound_disconnect_alert().await;
                    return SessionOutcome::Disconnected;
                }
                _ = shutdown.wait() => {
                    debug!("Shutdown interrupted session for subscriber {subscriber_id}");
                    return SessionOutcome::Shutdown;
                }
            };

            let Some(line) = line else {
                return SessionOutcome::Closed;
            };

            match self.sink.send_frame(encode_card_frame(&line)).await {
                Ok(()) => {
                    self.metrics.frame_sent();
                    self.pulse_indicator().await;
                }
                Err(e) if e.is_disconnect() => {
                    warn!("Subscriber {subscriber_id} disconnected: {e}");
                    self.sound_disconnect_alert().await;
                    return SessionOutcome::Disconnected;
                }
                Err(e) => {
                    error!("Unexpected failure streaming to subscriber {subscriber_id}: {e}");
                    return SessionOutcome::Failed;
                }
            }
        }
    }

    async fn pulse_indicator(&mut self) {
        self.peripherals.indicator.on();
        tokio::time::sleep(self.config.indicator_pulse).await;
        self.peripherals.indicator.off();
    }

    async fn sound_disconnect_alert(&mut self) {
        for _ in 0..self.config.alert_beeps {
            self.peripherals.buzzer.beep(self.config.alert_beep);
            tokio::time::sleep(self.config.alert_spacing).await;
        }
    }
}

/// Removes the subscriber and clears the indicator when a session ends.
///
/// `release` is the normal path. If the session future is dropped before
/// `release` finishes, including while it waits on the registry, `Drop`
/// finishes the unsubscribe on the runtime.
struct SubscriptionGuard {
    publisher: Publisher,
    subscriber_id: SubscriberId,
    channel: String,
    indicator: Arc<dyn Indicator>,
    indicator_cleared: bool,
    /// Set only once the unsubscribe has completed.
    released: bool,
}

impl SubscriptionGuard {
    async fn release(mut self) {
        self.clear_indicator();
        unsubscribe_quietly(&self.publisher, self.subscriber_id, &self.channel).await;
        self.released = true;
    }

    fn clear_indicator(&mut self) {
        if !self.indicator_cleared {
            self.indicator.off();
            self.indicator_cleared = true;
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        self.clear_indicator();

        let publisher = self.publisher.clone();
        let subscriber_id = self.subscriber_id;
        let channel = std::mem::take(&mut self.channel);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    unsubscribe_quietly(&publisher, subscriber_id, &channel).await;
                });
            }
            Err(_) => warn!(
                "No runtime to unsubscribe {subscriber_id} from '{channel}' after cancelled session"
            ),
        }
    }
}

/// Unsubscribe, treating "already gone" as success.
async fn unsubscribe_quietly(publisher: &Publisher, subscriber_id: SubscriberId, channel: &str) {
    match publisher.unsubscribe(subscriber_id, channel).await {
        Ok(()) => {}
        Err(e @ BroadcastError::SubscriberNotFound { .. }) => {
            debug!("Subscriber already removed: {e}");
        }
        Err(e) => error!("Failed to unsubscribe {subscriber_id}: {e}"),
    }
}
