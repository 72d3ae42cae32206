use crate::{
    BroadcastError, ChannelRegistry, Metrics, PublisherConfig, QueueError,
    Result as BroadcastResult, Subscriber, SubscriberId, Subscription, SubscriptionStream,
    payload::split_lines,
};

use std::panic::Location;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use log::{debug, warn};
use serde::Serialize;
use tokio::sync::RwLock;

/// Fans published payloads out to every subscriber of a channel.
///
/// Cheap to clone; all clones share one registry.
pub struct Publisher {
    pub(crate) registry: Arc<RwLock<ChannelRegistry>>,
    config: PublisherConfig,
    metrics: Metrics,
}

/// What one `publish` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers registered on the channel when publish started
    pub subscribers: usize,
    /// Lines each subscriber should have received
    pub lines: usize,
    /// Lines actually enqueued across all subscribers
    pub enqueued: usize,
    /// Subscribers skipped after the delivery timeout expired
    pub timed_out: usize,
    /// Subscribers removed while publish was waiting on them
    pub closed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSnapshot {
    pub channel: String,
    pub max_clients: usize,
    pub subscribers: Vec<SubscriberSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriberSnapshot {
    pub id: SubscriberId,
    pub queued: usize,
    pub subscribed_at: DateTime<Utc>,
}

enum Delivery {
    Complete,
    TimedOut,
    Closed,
}

impl Publisher {
    pub fn new(config: PublisherConfig, metrics: Metrics) -> Self {
        Self {
            registry: Arc::new(RwLock::new(ChannelRegistry::new(config.max_clients))),
            config,
            metrics,
        }
    }

    /// Register a new subscriber on `channel`.
    ///
    /// Returns `None` when the channel already has `max_clients` subscribers.
    /// That is admission control, not a failure.
    pub async fn subscribe(&self, channel: &str) -> Option<Subscription> {
        let subscriber = Subscriber::new(self.config.queue_capacity);
        let id = subscriber.id();
        let queue = Arc::clone(subscriber.queue());

        let admitted = self.registry.write().await.admit(channel, subscriber);
        if !admitted {
            self.metrics.subscriber_rejected();
            return None;
        }

        self.metrics.subscriber_admitted();
        Some(Subscription {
            id,
            channel: channel.to_string(),
            stream: SubscriptionStream::new(id, queue, self.config.pull_delay),
        })
    }

    /// Remove subscriber `id` from `channel` and close its queue.
    ///
    /// Fails with `SubscriberNotFound` if it is not registered there.
    pub async fn unsubscribe(&self, id: SubscriberId, channel: &str) -> BroadcastResult<()> {
        let removed = self.registry.write().await.remove(channel, id);

        let Some(subscriber) = removed else {
            return Err(BroadcastError::SubscriberNotFound {
                subscriber_id: id,
                channel: channel.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let discarded = subscriber.queue().close();
        if discarded > 0 {
            debug!("Discarded {discarded} undelivered lines for subscriber {id}");
        }

        self.metrics.subscriber_removed();
        Ok(())
    }

    /// Deliver every line of `data` to each subscriber of `channel`.
    ///
    /// Subscribers are served one after another in subscription order, each
    /// one completely before the next, so a full queue holds up everyone
    /// behind it. With a delivery timeout configured, a subscriber that
    /// cannot take its lines in time is skipped for the rest of this call.
    pub async fn publish<D: std::fmt::Display + ?Sized>(
        &self,
        data: &D,
        channel: &str,
    ) -> PublishReport {
        // Snapshot first: waiting on a queue must not hold the registry lock.
        let subscribers = self.registry.read().await.subscribers(channel);
        let lines = split_lines(data);

        let mut report = PublishReport {
            subscribers: subscribers.len(),
            lines: lines.len(),
            ..PublishReport::default()
        };

        for subscriber in &subscribers {
            let mut enqueued = 0;
            let outcome = self.deliver(subscriber, &lines, &mut enqueued).await;
            report.enqueued += enqueued;

            match outcome {
                Delivery::Complete => {}
                Delivery::TimedOut => {
                    warn!(
                        "Subscriber {} on '{channel}' did not drain in time, dropped {} of {} lines",
                        subscriber.id(),
                        lines.len() - enqueued,
                        lines.len()
                    );
                    self.metrics.delivery_timed_out();
                    report.timed_out += 1;
                }
                Delivery::Closed => {
                    debug!(
                        "Subscriber {} left '{channel}' during publish",
                        subscriber.id()
                    );
                    report.closed += 1;
                }
            }
        }

        debug!(
            "Published {} lines to '{channel}' ({} subscribers, {} enqueued)",
            report.lines, report.subscribers, report.enqueued
        );
        self.metrics.published(report.subscribers, report.enqueued);

        report
    }

    async fn deliver(
        &self,
        subscriber: &Subscriber,
        lines: &[String],
        enqueued: &mut usize,
    ) -> Delivery {
        let queue = subscriber.queue();
        let put_all = async {
            for line in lines {
                queue.put(line.clone()).await?;
                *enqueued += 1;
            }
            Ok::<(), QueueError>(())
        };

        let result = match self.config.delivery_timeout {
            Some(limit) => match tokio::time::timeout(limit, put_all).await {
                Ok(result) => result,
                Err(_) => return Delivery::TimedOut,
            },
            None => put_all.await,
        };

        match result {
            Ok(()) => Delivery::Complete,
            Err(_) => Delivery::Closed,
        }
    }

    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.registry.read().await.count(channel)
    }

    pub async fn contains(&self, id: SubscriberId, channel: &str) -> bool {
        self.registry.read().await.contains(channel, id)
    }

    pub async fn channels(&self) -> Vec<String> {
        self.registry.read().await.channels()
    }

    /// Point-in-time view of every channel, for health reporting.
    pub async fn snapshot(&self) -> Vec<ChannelSnapshot> {
        let registry = self.registry.read().await;
        registry
            .channels()
            .into_iter()
            .map(|channel| ChannelSnapshot {
                subscribers: registry
                    .subscribers(&channel)
                    .iter()
                    .map(|s| SubscriberSnapshot {
                        id: s.id(),
                        queued: s.queue().size(),
                        subscribed_at: s.subscribed_at(),
                    })
                    .collect(),
                max_clients: registry.max_clients(),
                channel,
            })
            .collect()
    }
}

impl Clone for Publisher {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
