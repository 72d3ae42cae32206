pub mod app_state;
pub mod bounded_queue;
pub mod channel_registry;
pub mod error;
pub mod frame;
pub mod frame_sink;
pub mod metrics;
pub mod payload;
pub mod peripherals;
pub mod publisher;
pub mod publisher_config;
pub mod session_config;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod sse_session;
pub mod subscriber;
pub mod subscriber_id;
pub mod subscription;
pub mod subscription_stream;

pub use app_state::{AppState, subscribe_handler};
pub use bounded_queue::BoundedQueue;
pub use channel_registry::ChannelRegistry;
pub use error::{BroadcastError, QueueError, QueueResult, Result};
pub use frame::{CARD_EVENT, CLIENTS_FULL_MESSAGE, encode_card_frame, encode_frame};
pub use frame_sink::{ChannelFrameSink, FrameReceiver, FrameSink};
pub use metrics::Metrics;
pub use payload::split_lines;
pub use peripherals::{Buzzer, Indicator, LogBuzzer, LogIndicator, SoftwareWatchdog, Watchdog};
pub use publisher::{ChannelSnapshot, PublishReport, Publisher, SubscriberSnapshot};
pub use publisher_config::PublisherConfig;
pub use session_config::SessionConfig;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use sse_session::{SessionOutcome, SessionPeripherals, SseSession};
pub use subscriber::Subscriber;
pub use subscriber_id::SubscriberId;
pub use subscription::Subscription;
pub use subscription_stream::SubscriptionStream;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one streaming session.
/// All log entries within the session task will include these fields.
pub fn create_session_span(subscriber_id: &str, channel: &str) -> tracing::Span {
    info_span!(
        "sse_session",
        subscriber_id = %subscriber_id,
        channel = %channel,
    )
}
