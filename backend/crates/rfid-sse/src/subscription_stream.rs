use crate::{BoundedQueue, SubscriberId};

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;

/// Pull side of one subscriber queue.
///
/// Each pull waits `pull_delay` and then for the next line. The stream has
/// no end of its own; it finishes only when the subscriber is removed and
/// its queue closed. Once finished it stays finished.
#[derive(Debug)]
pub struct SubscriptionStream {
    subscriber_id: SubscriberId,
    queue: Arc<BoundedQueue<String>>,
    pull_delay: Duration,
    finished: bool,
}

impl SubscriptionStream {
    pub fn new(
        subscriber_id: SubscriberId,
        queue: Arc<BoundedQueue<String>>,
        pull_delay: Duration,
    ) -> Self {
        Self {
            subscriber_id,
            queue,
            pull_delay,
            finished: false,
        }
    }

    /// Next delivered line, or `None` once the subscription is gone.
    pub async fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        if !self.pull_delay.is_zero() {
            tokio::time::sleep(self.pull_delay).await;
        }

        let line = self.queue.get().await;
        if line.is_none() {
            log::debug!("Stream for subscriber {} finished", self.subscriber_id);
            self.finished = true;
        }
        line
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn subscriber_id(&self) -> SubscriberId {
        self.subscriber_id
    }

    /// Adapt into a `futures::Stream` of lines.
    pub fn into_stream(self) -> impl Stream<Item = String> + Send {
        futures::stream::unfold(self, |mut stream| async move {
            let line = stream.next().await?;
            Some((line, stream))
        })
    }
}
